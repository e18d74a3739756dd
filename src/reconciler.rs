//! Reconciliation Adapter.
//!
//! Turns the declarative [`Element`] tree into the Node Model snapshot that
//! the traversal draws. Snapshots are rebuilt from scratch on every commit;
//! nothing from the previous snapshot is reused or mutated.
//!
//! Fragments are spliced into their parent. A [`Repeat`](crate::element::Repeat)
//! runs its generator here and becomes a `Canvas.Repeat` node holding the
//! generated children.

use crate::element::Element;
use crate::node::{ElementNode, Node, Props};
use crate::registry::ElementType;

/// The current children of the root, as of the last commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerInfo {
    pub rendered: Vec<Node>,
}

/// Root of one canvas's declarative tree.
#[derive(Debug, Default)]
pub struct RootContainer {
    info: ContainerInfo,
    mounted: bool,
    commits: u64,
}

impl RootContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a tree, replacing anything rendered before.
    pub fn render(&mut self, children: &[Element]) -> &ContainerInfo {
        if !self.mounted {
            log::debug!("Mounting root container");
            self.mounted = true;
        }
        self.commit(children)
    }

    /// Replace the rendered tree with a new version of it.
    pub fn update(&mut self, children: &[Element]) -> &ContainerInfo {
        if !self.mounted {
            return self.render(children);
        }
        self.commit(children)
    }

    /// Drop the rendered tree. The next [`render`](Self::render) starts a new
    /// mount.
    pub fn unmount(&mut self) {
        if self.mounted {
            log::debug!("Unmounting root container after {} commits", self.commits);
        }
        self.info.rendered.clear();
        self.mounted = false;
    }

    pub fn container_info(&self) -> &ContainerInfo {
        &self.info
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of commits since the container was created.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    fn commit(&mut self, children: &[Element]) -> &ContainerInfo {
        self.info.rendered = reconcile(children);
        self.commits += 1;
        log::trace!(
            "Commit {}: {} root nodes",
            self.commits,
            self.info.rendered.len()
        );
        &self.info
    }
}

/// Build a fresh snapshot from a declarative tree.
pub fn reconcile(elements: &[Element]) -> Vec<Node> {
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        snapshot_into(element, &mut out);
    }
    out
}

fn snapshot_into(element: &Element, out: &mut Vec<Node>) {
    match element {
        Element::Host {
            type_tag,
            props,
            children,
        } => out.push(Node::Element(ElementNode::new(
            type_tag.clone(),
            props.clone(),
            reconcile(children),
        ))),
        Element::Text(text) => out.push(Node::Text(text.clone())),
        Element::Fragment(children) => {
            for child in children {
                snapshot_into(child, out);
            }
        }
        Element::Repeat(repeat) => {
            let props = Props::new()
                .with("start", repeat.start)
                .with("step", repeat.step)
                .with("end", repeat.end)
                .with("restore", repeat.restore);
            out.push(Node::Element(ElementNode::new(
                ElementType::Repeat.tag(),
                props,
                reconcile(&repeat.expand()),
            )));
        }
    }
}
