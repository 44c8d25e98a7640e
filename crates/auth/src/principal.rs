use warden_core::ID;
use warden_core::Unique;

/// An account tokens are issued for, as read from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    id: ID<Self>,
    identifier: String,
    hashword: String,
    active: bool,
}

impl Principal {
    pub fn new(id: ID<Self>, identifier: String, hashword: String, active: bool) -> Self {
        Self {
            id,
            identifier,
            hashword,
            active,
        }
    }
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
    pub fn hashword(&self) -> &str {
        &self.hashword
    }
    pub fn active(&self) -> bool {
        self.active
    }
}

impl Unique for Principal {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
