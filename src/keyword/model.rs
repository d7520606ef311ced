use tracing::trace;

use crate::keyword::{Error, Map, Result};

/// The merged contents of a keyword deck, keyed by section (`nodes`,
/// `elements`, `boundary`, `curves`, `nodelist`, `nodesets`, `title`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    root: Map,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Map {
        &self.root
    }

    pub fn merge(&mut self, fragment: Map) -> Result<()> {
        trace!(sections = fragment.len(), "merging fragment");
        self.root.merge(fragment)
    }

    /// A section that has to be present.
    pub fn section(&self, name: &'static str) -> Result<&Map> {
        self.maybe_section(name)?
            .ok_or(Error::MissingSection(name))
    }

    pub fn maybe_section(&self, name: &'static str) -> Result<Option<&Map>> {
        self.root.get(name).map(|v| v.as_map(name)).transpose()
    }
}

impl From<Map> for Model {
    fn from(root: Map) -> Self {
        Self { root }
    }
}
