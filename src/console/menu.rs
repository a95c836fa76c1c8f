use crate::ui::Glyph;

/// Main menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Search,
    Refresh,
    ViewDetails,
    UpdatePassword,
    UpdateDisplayName,
    GenerateTokens,
    ShowAll,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::Search,
        MenuChoice::Refresh,
        MenuChoice::ViewDetails,
        MenuChoice::UpdatePassword,
        MenuChoice::UpdateDisplayName,
        MenuChoice::GenerateTokens,
        MenuChoice::ShowAll,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Search => "Search Users",
            MenuChoice::Refresh => "Refresh Users",
            MenuChoice::ViewDetails => "View User Details",
            MenuChoice::UpdatePassword => "Update Password",
            MenuChoice::UpdateDisplayName => "Update Display Name",
            MenuChoice::GenerateTokens => "Generate Tokens",
            MenuChoice::ShowAll => "Show All Users",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn glyph(self) -> Glyph {
        match self {
            MenuChoice::Search => Glyph::Search,
            MenuChoice::Refresh => Glyph::Refresh,
            MenuChoice::ViewDetails => Glyph::Eye,
            MenuChoice::UpdatePassword => Glyph::Key,
            MenuChoice::UpdateDisplayName => Glyph::User,
            MenuChoice::GenerateTokens => Glyph::Ticket,
            MenuChoice::ShowAll => Glyph::List,
            MenuChoice::Exit => Glyph::Exit,
        }
    }

    /// Parse the operator's answer to the main menu prompt
    pub fn parse(input: &str) -> Option<MenuChoice> {
        let n: usize = input.trim().trim_end_matches('.').parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Ways of producing a token for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMethod {
    CustomToken,
    IdTokenFromCustomToken,
    IdTokenFromPassword,
}

impl TokenMethod {
    pub const ALL: [TokenMethod; 3] = [
        TokenMethod::CustomToken,
        TokenMethod::IdTokenFromCustomToken,
        TokenMethod::IdTokenFromPassword,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TokenMethod::CustomToken => "Custom token (signed with the service account)",
            TokenMethod::IdTokenFromCustomToken => "ID token via custom token exchange",
            TokenMethod::IdTokenFromPassword => "ID token via email/password sign-in",
        }
    }

    pub fn needs_sign_in(self) -> bool {
        !matches!(self, TokenMethod::CustomToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_map_one_to_one() {
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            assert_eq!(choice.number(), i + 1);
            assert_eq!(MenuChoice::parse(&(i + 1).to_string()), Some(*choice));
        }
    }

    #[test]
    fn parse_rejects_out_of_range_and_garbage() {
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("9"), None);
        assert_eq!(MenuChoice::parse("search"), None);
        assert_eq!(MenuChoice::parse(""), None);
        assert_eq!(MenuChoice::parse(" 8 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("3."), Some(MenuChoice::ViewDetails));
    }

    #[test]
    fn labels_follow_menu_order() {
        let labels: Vec<_> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            [
                "Search Users",
                "Refresh Users",
                "View User Details",
                "Update Password",
                "Update Display Name",
                "Generate Tokens",
                "Show All Users",
                "Exit"
            ]
        );
    }
}
