use super::{ActionSpec, FlagSpec};

/// Groups the actions available on one kind of resource, e.g. "container".
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    short_desc: String,
    long_desc: String,
    flags: Vec<FlagSpec>,
    actions: Vec<ActionSpec>,
}

impl CommandSpec {
    pub fn new<N: Into<String>>(name: N) -> Self {
        CommandSpec {
            name: name.into(),
            short_desc: String::new(),
            long_desc: String::new(),
            flags: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn short_desc<S: Into<String>>(mut self, desc: S) -> Self {
        self.short_desc = desc.into();
        self
    }

    pub fn long_desc<S: Into<String>>(mut self, desc: S) -> Self {
        self.long_desc = desc.into();
        self
    }

    /// Adds a flag shared by every action of the command
    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn action(mut self, action: ActionSpec) -> Self {
        self.actions.push(action);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_short_desc(&self) -> &str {
        &self.short_desc
    }

    pub fn get_long_desc(&self) -> &str {
        if self.long_desc.is_empty() {
            &self.short_desc
        } else {
            &self.long_desc
        }
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    pub fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    /// Finds an action by its name or one of its aliases
    pub fn find_action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.answers_to(name))
    }
}
