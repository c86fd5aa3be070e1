use serde::{Deserialize, Serialize};

use super::component::*;
use crate::error::StructureError;

/// Handle to a component stored in a [`Rocket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(usize);

#[derive(Debug, Clone)]
struct Node {
    component: Component,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
}

/// The vehicle: a rooted component tree.
///
/// Components live in an arena and are addressed by [`ComponentId`]. The root
/// node is the vehicle itself; stages are its direct children in axial order,
/// and every other component hangs below a stage.
#[derive(Debug, Clone)]
pub struct Rocket {
    nodes: Vec<Node>,
}

/// A component with its nested children, used for tree responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentTreeNode {
    #[serde(flatten)]
    pub component: Component,
    pub children: Vec<ComponentTreeNode>,
}

impl Rocket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                component: Component::new(name, ComponentKind::Rocket),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> ComponentId {
        ComponentId(0)
    }

    pub fn name(&self) -> &str {
        &self.nodes[0].component.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.get(id.0).map(|n| &n.component)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.nodes.get_mut(id.0).map(|n| &mut n.component)
    }

    /// Like [`Rocket::get`], but an unknown handle is a structural error.
    pub fn component(&self, id: ComponentId) -> Result<&Component, StructureError> {
        self.get(id).ok_or(StructureError::UnknownComponent)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component, StructureError> {
        self.get_mut(id).ok_or(StructureError::UnknownComponent)
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Append a component as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: ComponentId,
        component: Component,
    ) -> Result<ComponentId, StructureError> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, component)
    }

    /// Insert a component at `index` among the children of `parent`.
    ///
    /// Indices past the end append. Fails if `parent` is unknown or cannot
    /// host this kind of component.
    pub fn insert_child(
        &mut self,
        parent: ComponentId,
        index: usize,
        component: Component,
    ) -> Result<ComponentId, StructureError> {
        let parent_kind = &self.component(parent)?.kind;
        if !parent_kind.can_contain(&component.kind) {
            return Err(StructureError::InvalidChild {
                parent: parent_kind.type_name(),
                child: component.kind.type_name(),
            });
        }

        let id = ComponentId(self.nodes.len());
        self.nodes.push(Node {
            component,
            parent: Some(parent),
            children: Vec::new(),
        });
        let siblings = &mut self.nodes[parent.0].children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        Ok(id)
    }

    pub fn stages(&self) -> &[ComponentId] {
        self.children(self.root())
    }

    pub fn stage_count(&self) -> usize {
        self.stages().len()
    }

    /// The stage a component belongs to, or `None` for the root.
    pub fn stage_of(&self, id: ComponentId) -> Option<ComponentId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root() {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Depth-first pre-order walk, root first.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &Component)> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev());
            Some((id, &self.nodes[id.0].component))
        })
    }

    /// Ids in depth-first pre-order, for callers that mutate while walking.
    pub fn ids(&self) -> Vec<ComponentId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<ComponentId> {
        self.iter().find(|(_, c)| c.name == name).map(|(id, _)| id)
    }

    pub fn to_tree(&self) -> ComponentTreeNode {
        self.subtree(self.root())
    }

    fn subtree(&self, id: ComponentId) -> ComponentTreeNode {
        ComponentTreeNode {
            component: self.nodes[id.0].component.clone(),
            children: self.children(id).iter().map(|c| self.subtree(*c)).collect(),
        }
    }

    /// Compare two trees node by node, ignoring instance identity.
    pub fn structurally_eq(&self, other: &Rocket) -> bool {
        self.subtree_eq(self.root(), other, other.root())
    }

    fn subtree_eq(&self, a: ComponentId, other: &Rocket, b: ComponentId) -> bool {
        let (left, right) = (self.children(a), other.children(b));
        self.nodes[a.0]
            .component
            .same_structure(&other.nodes[b.0].component)
            && left.len() == right.len()
            && left
                .iter()
                .zip(right)
                .all(|(x, y)| self.subtree_eq(*x, other, *y))
    }

    // ============================================================
    // Axial neighbour resolution
    // ============================================================

    /// All stage-level components from nose to tail.
    pub fn axial_components(&self) -> Vec<ComponentId> {
        self.stages()
            .iter()
            .flat_map(|stage| self.children(*stage).iter().copied())
            .filter(|id| self.nodes[id.0].component.kind.is_axial())
            .collect()
    }

    fn axial_neighbours(&self, id: ComponentId) -> (Option<ComponentId>, Option<ComponentId>) {
        let order = self.axial_components();
        match order.iter().position(|c| *c == id) {
            Some(i) => (
                i.checked_sub(1).map(|p| order[p]),
                order.get(i + 1).copied(),
            ),
            None => (None, None),
        }
    }

    fn declared_fore(&self, id: ComponentId) -> Radius {
        match &self.nodes[id.0].component.kind {
            ComponentKind::NoseCone(_) => Radius::Explicit(0.0),
            ComponentKind::BodyTube(t) => t.outer_radius,
            ComponentKind::Transition(t) => t.fore_radius,
            _ => Radius::Unset,
        }
    }

    fn declared_aft(&self, id: ComponentId) -> Radius {
        match &self.nodes[id.0].component.kind {
            ComponentKind::NoseCone(c) => c.aft_radius,
            ComponentKind::BodyTube(t) => t.outer_radius,
            ComponentKind::Transition(t) => t.aft_radius,
            _ => Radius::Unset,
        }
    }

    /// Aft radius of `id`, following automatic radii towards the nose only.
    fn look_back(&self, id: Option<ComponentId>) -> Option<f64> {
        let id = id?;
        match self.declared_aft(id) {
            Radius::Explicit(v) => Some(v),
            Radius::Automatic => {
                let passthrough = matches!(
                    self.nodes[id.0].component.kind,
                    ComponentKind::BodyTube(_)
                );
                let prev = if passthrough {
                    self.axial_neighbours(id).0
                } else {
                    None
                };
                self.look_back(prev)
            }
            Radius::Unset => None,
        }
    }

    /// Fore radius of `id`, following automatic radii towards the tail only.
    fn look_forward(&self, id: Option<ComponentId>) -> Option<f64> {
        let id = id?;
        match self.declared_fore(id) {
            Radius::Explicit(v) => Some(v),
            Radius::Automatic => {
                let passthrough = matches!(
                    self.nodes[id.0].component.kind,
                    ComponentKind::BodyTube(_)
                );
                let next = if passthrough {
                    self.axial_neighbours(id).1
                } else {
                    None
                };
                self.look_forward(next)
            }
            Radius::Unset => None,
        }
    }

    pub fn resolved_fore_radius(&self, id: ComponentId) -> f64 {
        match self.declared_fore(id) {
            Radius::Explicit(v) => v,
            Radius::Automatic => {
                let (prev, next) = self.axial_neighbours(id);
                self.look_back(prev)
                    .or_else(|| {
                        // a tube has one radius, so either neighbour may define it
                        if matches!(
                            self.nodes[id.0].component.kind,
                            ComponentKind::BodyTube(_)
                        ) {
                            self.look_forward(next)
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0.0)
            }
            Radius::Unset => 0.0,
        }
    }

    pub fn resolved_aft_radius(&self, id: ComponentId) -> f64 {
        match self.declared_aft(id) {
            Radius::Explicit(v) => v,
            Radius::Automatic => {
                if matches!(
                    self.nodes[id.0].component.kind,
                    ComponentKind::BodyTube(_)
                ) {
                    return self.resolved_fore_radius(id);
                }
                let (_, next) = self.axial_neighbours(id);
                self.look_forward(next).unwrap_or(0.0)
            }
            Radius::Unset => 0.0,
        }
    }

    /// Outer radius of a body tube, or the aft radius of any other axial component.
    pub fn resolved_outer_radius(&self, id: ComponentId) -> f64 {
        self.resolved_aft_radius(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tube(name: &str, radius: Radius) -> Component {
        Component::new(
            name,
            ComponentKind::BodyTube(BodyTube {
                length: 0.3,
                outer_radius: radius,
                ..BodyTube::default()
            }),
        )
    }

    fn cone(name: &str, fore: Radius, aft: Radius) -> Component {
        Component::new(
            name,
            ComponentKind::Transition(Transition {
                fore_radius: fore,
                aft_radius: aft,
                length: 0.05,
                ..Transition::default()
            }),
        )
    }

    #[test]
    fn insert_child_places_component_first() {
        let mut rocket = Rocket::new("Rocket");
        let stage = rocket.add_child(rocket.root(), Component::stage("Stage")).unwrap();
        let body = rocket.add_child(stage, tube("Body", Radius::explicit(0.02))).unwrap();
        let shoulder = rocket
            .insert_child(stage, 0, cone("Shoulder", Radius::Automatic, Radius::explicit(0.02)))
            .unwrap();

        assert_eq!(rocket.children(stage), &[shoulder, body]);
        assert_eq!(rocket.parent(shoulder), Some(stage));
        assert_eq!(rocket.stage_of(shoulder), Some(stage));
    }

    #[test]
    fn rejects_component_under_wrong_parent() {
        let mut rocket = Rocket::new("Rocket");
        let err = rocket
            .add_child(rocket.root(), tube("Body", Radius::Automatic))
            .unwrap_err();
        assert!(matches!(
            err,
            StructureError::InvalidChild {
                parent: "Rocket",
                child: "BodyTube"
            }
        ));
        assert!(rocket.is_empty());
    }

    #[test]
    fn iter_is_depth_first_pre_order() {
        let mut rocket = Rocket::new("Rocket");
        let s1 = rocket.add_child(rocket.root(), Component::stage("S1")).unwrap();
        rocket.add_child(s1, tube("B1", Radius::Automatic)).unwrap();
        let s2 = rocket.add_child(rocket.root(), Component::stage("S2")).unwrap();
        rocket.add_child(s2, tube("B2", Radius::Automatic)).unwrap();

        let names: Vec<_> = rocket.iter().map(|(_, c)| c.name.as_str()).collect();
        assert_eq!(names, vec!["Rocket", "S1", "B1", "S2", "B2"]);
    }

    #[test]
    fn automatic_radii_follow_neighbours() {
        let mut rocket = Rocket::new("Rocket");
        let stage = rocket.add_child(rocket.root(), Component::stage("Stage")).unwrap();
        let first = rocket.add_child(stage, tube("Upper", Radius::explicit(0.03))).unwrap();
        let taper = rocket
            .add_child(stage, cone("Taper", Radius::Automatic, Radius::Automatic))
            .unwrap();
        let lower = rocket.add_child(stage, tube("Lower", Radius::Automatic)).unwrap();
        rocket.add_child(stage, cone("Tail", Radius::explicit(0.02), Radius::explicit(0.01))).unwrap();

        assert_eq!(rocket.resolved_outer_radius(first), 0.03);
        assert_eq!(rocket.resolved_fore_radius(taper), 0.03);
        assert_eq!(rocket.resolved_outer_radius(lower), 0.02);
        assert_eq!(rocket.resolved_aft_radius(taper), 0.02);
    }

    #[test]
    fn structural_equality_ignores_identity() {
        let build = || {
            let mut rocket = Rocket::new("Rocket");
            let stage = rocket.add_child(rocket.root(), Component::stage("Stage")).unwrap();
            rocket.add_child(stage, tube("Body", Radius::explicit(0.02))).unwrap();
            rocket
        };
        let (a, b) = (build(), build());
        assert!(a.structurally_eq(&b));

        let mut c = build();
        let body = c.find_by_name("Body").unwrap();
        c.get_mut(body).unwrap().name = "Other".into();
        assert!(!a.structurally_eq(&c));
    }
}
