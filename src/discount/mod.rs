use std::collections::HashSet;

// Codes are stored upper-cased; membership is case-insensitive. The set is
// fixed for the process lifetime and carried in BotConfig so tests can build
// their own.
#[derive(Clone, Debug, Default)]
pub struct DiscountCodes {
    codes: HashSet<String>,
}

impl DiscountCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes.into_iter()
            .map(|v| v.as_ref().trim().to_uppercase())
            .filter(|v| !v.is_empty())
            .collect();

        Self { codes }
    }

    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn is_valid(&self, code: &str) -> bool {
        self.codes.contains(&code.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::DiscountCodes;

    #[test]
    fn membership_is_case_insensitive() {
        let codes = DiscountCodes::new(["ILLEGAL10"]);

        assert!(codes.is_valid("ILLEGAL10"));
        assert!(codes.is_valid("illegal10"));
        assert!(codes.is_valid("IlLeGaL10"));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let codes = DiscountCodes::new(["ILLEGAL10", "WELCOME5"]);

        assert!(!codes.is_valid("ILLEGAL15"));
        assert!(!codes.is_valid(""));
        assert!(!codes.is_valid("welcome"));
    }

    #[test]
    fn probe_is_trimmed() {
        let codes = DiscountCodes::new(["WELCOME5"]);

        assert!(codes.is_valid("  welcome5  "));
    }

    #[test]
    fn list_parsing_trims_and_drops_empty_entries() {
        let codes = DiscountCodes::parse_list(" illegal10, WELCOME5 ,, ");

        assert_eq!(codes.len(), 2);
        assert!(codes.is_valid("Illegal10"));
        assert!(codes.is_valid("welcome5"));
    }

    #[test]
    fn empty_list_rejects_everything() {
        let codes = DiscountCodes::parse_list("");

        assert!(codes.is_empty());
        assert!(!codes.is_valid("ILLEGAL10"));
    }
}
