use std::fmt;
use std::sync::Arc;

use super::FlagSpec;
use crate::exec::Executor;

/// Declares one invocable action: its identity, its flags and the executor
/// that implements it.
#[derive(Clone)]
pub struct ActionSpec {
    name: String,
    aliases: Vec<String>,
    short_desc: String,
    long_desc: String,
    example: String,
    matchers: Vec<FlagSpec>,
    flags: Vec<FlagSpec>,
    executor: Arc<dyn Executor>,
}

impl ActionSpec {
    pub fn new<N: Into<String>>(name: N, executor: Arc<dyn Executor>) -> Self {
        ActionSpec {
            name: name.into(),
            aliases: Vec::new(),
            short_desc: String::new(),
            long_desc: String::new(),
            example: String::new(),
            matchers: Vec::new(),
            flags: Vec::new(),
            executor,
        }
    }

    pub fn alias<S: Into<String>>(mut self, alias: S) -> Self {
        let alias = alias.into();
        if alias != self.name && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    pub fn short_desc<S: Into<String>>(mut self, desc: S) -> Self {
        self.short_desc = desc.into();
        self
    }

    pub fn long_desc<S: Into<String>>(mut self, desc: S) -> Self {
        self.long_desc = desc.into();
        self
    }

    pub fn example<S: Into<String>>(mut self, example: S) -> Self {
        self.example = example.into();
        self
    }

    pub fn matcher(mut self, flag: FlagSpec) -> Self {
        self.matchers.push(flag);
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether `name` is the action name or one of its aliases
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    pub fn get_short_desc(&self) -> &str {
        &self.short_desc
    }

    /// Long description, falling back to the short one when none was given
    pub fn get_long_desc(&self) -> &str {
        if self.long_desc.is_empty() {
            &self.short_desc
        } else {
            &self.long_desc
        }
    }

    pub fn get_example(&self) -> &str {
        &self.example
    }

    pub fn matchers(&self) -> &[FlagSpec] {
        &self.matchers
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }
}

impl fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("matchers", &self.matchers)
            .field("flags", &self.flags)
            .field("executor", &self.executor.name())
            .finish()
    }
}
