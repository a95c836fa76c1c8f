/// Plain unicode glyphs used in notices and menus.
///
/// Restricted to characters available in common terminal fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Check,
    Cross,
    Warning,
    Info,
    Search,
    Refresh,
    Eye,
    Key,
    User,
    Ticket,
    List,
    Exit,
    Lock,
    Active,
    Filled,
    Empty,
}

impl Glyph {
    pub const fn unicode(&self) -> char {
        match self {
            Self::Check => '✔',
            Self::Cross => '✘',
            Self::Warning => '⚠',
            Self::Info => 'ℹ',
            Self::Search => '⌕',
            Self::Refresh => '↻',
            Self::Eye => '◉',
            Self::Key => '⚿',
            Self::User => '☺',
            Self::Ticket => '✎',
            Self::List => '☰',
            Self::Exit => '⏻',
            Self::Lock => '⊘',
            Self::Active => '●',
            Self::Filled => '●',
            Self::Empty => '○',
        }
    }
}

impl std::fmt::Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unicode())
    }
}

impl From<Glyph> for char {
    fn from(icon: Glyph) -> Self {
        icon.unicode()
    }
}
