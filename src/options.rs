//! Contributor configuration.

/// Rule deciding whether an optional knob of a linked-entity configuration
/// is copied into the normalized descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnobCopy {
    /// Copy every supplied knob, falsy values included.
    #[default]
    Present,
    /// Copy only truthy knobs; `0`, `""`, `false` and `null` are dropped.
    Truthy,
}

impl KnobCopy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "present" => Some(Self::Present),
            "truthy" => Some(Self::Truthy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContributorOptions {
    pub knob_copy: KnobCopy,
}

impl ContributorOptions {
    pub fn truthy() -> Self {
        Self {
            knob_copy: KnobCopy::Truthy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_present() {
        assert_eq!(ContributorOptions::default().knob_copy, KnobCopy::Present);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(KnobCopy::from_str("Truthy"), Some(KnobCopy::Truthy));
        assert_eq!(KnobCopy::from_str("present"), Some(KnobCopy::Present));
        assert_eq!(KnobCopy::from_str("defined"), None);
    }
}
