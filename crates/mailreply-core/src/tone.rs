#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    None,
    Professional,
    Casual,
    Friendly,
}

impl Tone {
    /// Value sent to the generation endpoint. `None` goes out as an empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::None => "",
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Friendly => "Friendly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Some(Tone::None),
            "professional" => Some(Tone::Professional),
            "casual" => Some(Tone::Casual),
            "friendly" => Some(Tone::Friendly),
            _ => None,
        }
    }

    pub fn all() -> Vec<Tone> {
        vec![Tone::None, Tone::Professional, Tone::Casual, Tone::Friendly]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tone::None => "None",
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Friendly => "Friendly",
        }
    }

    pub fn next(&self) -> Tone {
        let all = Self::all();
        let idx = all.iter().position(|t| t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(&self) -> Tone {
        let all = Self::all();
        let idx = all.iter().position(|t| t == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(Tone::None.as_str(), "");
        assert_eq!(Tone::Professional.as_str(), "Professional");
        assert_eq!(Tone::Casual.as_str(), "Casual");
        assert_eq!(Tone::Friendly.as_str(), "Friendly");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(Tone::from_str("CASUAL"), Some(Tone::Casual));
        assert_eq!(Tone::from_str(" friendly "), Some(Tone::Friendly));
        assert_eq!(Tone::from_str("None"), Some(Tone::None));
        assert_eq!(Tone::from_str(""), Some(Tone::None));
        assert_eq!(Tone::from_str("sarcastic"), None);
    }

    #[test]
    fn test_cycle_wraps_around() {
        assert_eq!(Tone::Friendly.next(), Tone::None);
        assert_eq!(Tone::None.previous(), Tone::Friendly);

        let mut tone = Tone::None;
        for _ in 0..Tone::all().len() {
            tone = tone.next();
        }
        assert_eq!(tone, Tone::None);
    }
}
