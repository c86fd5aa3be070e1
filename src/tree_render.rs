//! ASCII tree rendering for component trees.

use rocketfile_core::models::{ComponentKind, ComponentTreeNode, Rocket};

const STAGE: char = '▣';
const NOSE_CONE: char = '▲';
const BODY_TUBE: char = '█';
const TRANSITION: char = '◢';
const FIN_SET: char = '◣';
const RING: char = '○';

fn kind_symbol(kind: &ComponentKind) -> Option<char> {
    match kind {
        ComponentKind::Rocket => None,
        ComponentKind::Stage => Some(STAGE),
        ComponentKind::NoseCone(_) => Some(NOSE_CONE),
        ComponentKind::BodyTube(_) => Some(BODY_TUBE),
        ComponentKind::Transition(_) => Some(TRANSITION),
        ComponentKind::FinSet(_) => Some(FIN_SET),
        ComponentKind::Ring(_) => Some(RING),
    }
}

/// Render a rocket as ASCII art with a symbol per component kind.
///
/// Example output:
/// ```text
/// Rocket
/// └── ▣ Sustainer
///     ├── ▲ Nose Cone
///     └── █ Body Tube
///         └── ◣ Fin
/// ```
pub fn render_tree(rocket: &Rocket) -> String {
    let mut output = String::new();
    render_node(&mut output, &rocket.to_tree(), "", true, true);
    output
}

fn render_node(
    output: &mut String,
    node: &ComponentTreeNode,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    let component = &node.component;
    if is_root {
        output.push_str(&component.name);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        if let Some(symbol) = kind_symbol(&component.kind) {
            output.push(symbol);
            output.push(' ');
        }
        output.push_str(&component.name);
        if let Some(motor) = motor_label(&component.kind) {
            output.push_str(" [");
            output.push_str(&motor);
            output.push(']');
        }
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

fn motor_label(kind: &ComponentKind) -> Option<String> {
    let ComponentKind::BodyTube(tube) = kind else {
        return None;
    };
    tube.motor
        .as_ref()
        .map(|mount| format!("{} {}", mount.motor.manufacturer, mount.motor.designation))
}
