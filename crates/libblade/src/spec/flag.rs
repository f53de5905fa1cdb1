/// Describes one configurable parameter of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    name: String,
    desc: String,
    takes_value: bool,
    required: bool,
}

impl FlagSpec {
    /// Flag carrying a value, e.g. `--container-id a76d53933d3f`
    pub fn value<N: Into<String>, D: Into<String>>(name: N, desc: D) -> Self {
        FlagSpec {
            name: name.into(),
            desc: desc.into(),
            takes_value: true,
            required: false,
        }
    }

    /// Flag without a value whose presence alone means "set", e.g. `--force`
    pub fn switch<N: Into<String>, D: Into<String>>(name: N, desc: D) -> Self {
        FlagSpec {
            name: name.into(),
            desc: desc.into(),
            takes_value: false,
            required: false,
        }
    }

    /// Only value flags can be required; a switch is always optional.
    pub fn required(mut self) -> Self {
        self.required = self.takes_value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}
