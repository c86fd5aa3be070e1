//! Streaming element-handler stack over `quick-xml` events.
//!
//! Every open XML element owns one handler frame. A frame's handler decides
//! which handler processes each child element (`open_element`), consumes the
//! text of leaf children as they close (`close_element`), and finalizes its
//! own state once all children are done (`end_handler`). The stack therefore
//! mirrors the XML nesting exactly.

mod fields;

pub use fields::{ScalarFields, ScalarKind};

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ImportError;

pub type Attributes = HashMap<String, String>;

/// One level of the handler stack.
///
/// Handlers form a closed set per file format, so `open_element` returns a
/// value of the same type rather than a boxed trait object.
pub trait ElementHandler<C>: Sized {
    /// Choose the handler for a child element.
    fn open_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        ctx: &mut C,
    ) -> Result<Self, ImportError>;

    /// A child element closed; `content` is its trimmed text.
    fn close_element(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut C,
    ) -> Result<(), ImportError> {
        Ok(())
    }

    /// This handler's own element closed after all of its children.
    fn end_handler(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        _ctx: &mut C,
    ) -> Result<(), ImportError> {
        Ok(())
    }
}

struct Frame<H> {
    handler: H,
    element: String,
    attributes: Attributes,
    content: String,
}

/// Drive `root` over every element of the document in `source`.
///
/// `root` receives the document element through `open_element`. Malformed
/// XML and any error returned by a handler abort the parse.
pub fn parse<R: BufRead, C, H: ElementHandler<C>>(
    source: R,
    root: H,
    ctx: &mut C,
) -> Result<(), ImportError> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Frame {
        handler: root,
        element: String::new(),
        attributes: Attributes::new(),
        content: String::new(),
    }];
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let frame = open(&reader, &e, &mut stack, ctx)?;
                stack.push(frame);
            }
            Event::Empty(e) => {
                let frame = open(&reader, &e, &mut stack, ctx)?;
                stack.push(frame);
                close(&mut stack, ctx)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                if let Some(top) = stack.last_mut() {
                    top.content.push_str(&text);
                }
            }
            Event::CData(e) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(quick_xml::Error::from)?
                    .into_owned();
                if let Some(top) = stack.last_mut() {
                    top.content.push_str(&text);
                }
            }
            Event::End(_) => close(&mut stack, ctx)?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(ImportError::InvalidDocument(
            "document ended before all elements were closed".to_string(),
        ));
    }
    Ok(())
}

fn open<R, C, H: ElementHandler<C>>(
    reader: &Reader<R>,
    start: &BytesStart<'_>,
    stack: &mut [Frame<H>],
    ctx: &mut C,
) -> Result<Frame<H>, ImportError> {
    let decode = |bytes: &[u8]| {
        reader
            .decoder()
            .decode(bytes)
            .map(|s| s.into_owned())
            .map_err(quick_xml::Error::from)
    };
    let element = decode(start.name().as_ref())?;
    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = decode(attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }

    let parent = stack
        .last_mut()
        .ok_or_else(|| ImportError::InvalidDocument("handler stack is empty".to_string()))?;
    let handler = parent.handler.open_element(&element, &attributes, ctx)?;

    Ok(Frame {
        handler,
        element,
        attributes,
        content: String::new(),
    })
}

fn close<C, H: ElementHandler<C>>(
    stack: &mut Vec<Frame<H>>,
    ctx: &mut C,
) -> Result<(), ImportError> {
    if stack.len() < 2 {
        return Err(ImportError::InvalidDocument(
            "closing element without matching start".to_string(),
        ));
    }
    let Some(mut frame) = stack.pop() else {
        return Ok(());
    };
    let content = frame.content.trim();
    frame
        .handler
        .end_handler(&frame.element, &frame.attributes, content, ctx)?;

    if let Some(parent) = stack.last_mut() {
        parent
            .handler
            .close_element(&frame.element, &frame.attributes, content, ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the callback sequence for a tiny two-level grammar.
    #[derive(Debug)]
    enum Recorder {
        Root,
        Group,
        Text,
    }

    impl ElementHandler<Vec<String>> for Recorder {
        fn open_element(
            &mut self,
            element: &str,
            _attributes: &Attributes,
            log: &mut Vec<String>,
        ) -> Result<Self, ImportError> {
            log.push(format!("open {}", element));
            Ok(match (self, element) {
                (Recorder::Root, "group") => Recorder::Group,
                _ => Recorder::Text,
            })
        }

        fn close_element(
            &mut self,
            element: &str,
            _attributes: &Attributes,
            content: &str,
            log: &mut Vec<String>,
        ) -> Result<(), ImportError> {
            log.push(format!("close {}={}", element, content));
            Ok(())
        }

        fn end_handler(
            &mut self,
            element: &str,
            attributes: &Attributes,
            _content: &str,
            log: &mut Vec<String>,
        ) -> Result<(), ImportError> {
            if let Recorder::Group = self {
                let id = attributes.get("id").cloned().unwrap_or_default();
                log.push(format!("end {} {}", element, id));
            }
            Ok(())
        }
    }

    #[test]
    fn callbacks_follow_nesting() {
        let xml = r#"<group id="g1"><a> 1 </a><b/></group>"#;
        let mut log = Vec::new();
        parse(xml.as_bytes(), Recorder::Root, &mut log).unwrap();
        assert_eq!(
            log,
            vec![
                "open group",
                "open a",
                "close a=1",
                "open b",
                "close b=",
                "end group g1",
                "close group=",
            ]
        );
    }

    #[test]
    fn mismatched_tags_are_fatal() {
        let xml = "<group><a>1</b></group>";
        let mut log = Vec::new();
        let err = parse(xml.as_bytes(), Recorder::Root, &mut log).unwrap_err();
        assert!(matches!(err, ImportError::Xml(_)));
    }

    #[test]
    fn unclosed_document_is_fatal() {
        let xml = "<group><a>1</a>";
        let mut log = Vec::new();
        assert!(parse(xml.as_bytes(), Recorder::Root, &mut log).is_err());
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = "<group><a>1 &amp; 2</a></group>";
        let mut log = Vec::new();
        parse(xml.as_bytes(), Recorder::Root, &mut log).unwrap();
        assert!(log.contains(&"close a=1 & 2".to_string()));
    }
}
