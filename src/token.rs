//! The token definition for the filter language.

/// A token is a single unit of the language, with a specific kind and location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Index of the token in the input sequence.
    pub position: usize,
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Open(Bracket),        // { ( [
    Close(Bracket),       // } ) ]
    Operator(LogicalOp),  // and, or
    Leaf(&'a str),
}

/// The three interchangeable grouping families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Curly,
    Round,
    Square,
}

impl Bracket {
    pub fn open_char(self) -> char {
        match self {
            Bracket::Curly => '{',
            Bracket::Round => '(',
            Bracket::Square => '[',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Bracket::Curly => '}',
            Bracket::Round => ')',
            Bracket::Square => ']',
        }
    }

    pub fn from_open(c: char) -> Option<Self> {
        match c {
            '{' => Some(Bracket::Curly),
            '(' => Some(Bracket::Round),
            '[' => Some(Bracket::Square),
            _ => None,
        }
    }

    pub fn from_close(c: char) -> Option<Self> {
        match c {
            '}' => Some(Bracket::Curly),
            ')' => Some(Bracket::Round),
            ']' => Some(Bracket::Square),
            _ => None,
        }
    }
}

/// Binary combinators. Both share one precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

impl<'a> TokenKind<'a> {
    /// Classify a raw token. Structural tokens must match exactly; everything
    /// else is a leaf.
    pub fn classify(text: &'a str) -> Self {
        match text {
            "and" => return TokenKind::Operator(LogicalOp::And),
            "or" => return TokenKind::Operator(LogicalOp::Or),
            _ => {}
        }

        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(b) = Bracket::from_open(c) {
                return TokenKind::Open(b);
            }
            if let Some(b) = Bracket::from_close(c) {
                return TokenKind::Close(b);
            }
        }
        TokenKind::Leaf(text)
    }
}

impl<'a> Token<'a> {
    pub fn new(text: &'a str, position: usize) -> Self {
        Self {
            kind: TokenKind::classify(text),
            position,
        }
    }

    /// Classify an already split sequence, numbering tokens from zero.
    pub fn classify_all<S: AsRef<str>>(raw: &'a [S]) -> Vec<Token<'a>> {
        raw.iter()
            .enumerate()
            .map(|(i, s)| Token::new(s.as_ref(), i))
            .collect()
    }

    /// The source text of the token.
    pub fn text(&self) -> &'a str {
        match self.kind {
            TokenKind::Open(Bracket::Curly) => "{",
            TokenKind::Open(Bracket::Round) => "(",
            TokenKind::Open(Bracket::Square) => "[",
            TokenKind::Close(Bracket::Curly) => "}",
            TokenKind::Close(Bracket::Round) => ")",
            TokenKind::Close(Bracket::Square) => "]",
            TokenKind::Operator(op) => op.as_str(),
            TokenKind::Leaf(s) => s,
        }
    }
}
