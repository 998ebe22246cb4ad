//! Card-related types for the Higher/Lower game.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card rank. Aces are always high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl CardRank {
    pub const ALL: [CardRank; 13] = [
        CardRank::Two,
        CardRank::Three,
        CardRank::Four,
        CardRank::Five,
        CardRank::Six,
        CardRank::Seven,
        CardRank::Eight,
        CardRank::Nine,
        CardRank::Ten,
        CardRank::Jack,
        CardRank::Queen,
        CardRank::King,
        CardRank::Ace,
    ];

    /// Comparison value: numerals map to themselves, J=11, Q=12, K=13, A=14.
    pub fn value(self) -> u8 {
        match self {
            CardRank::Two => 2,
            CardRank::Three => 3,
            CardRank::Four => 4,
            CardRank::Five => 5,
            CardRank::Six => 6,
            CardRank::Seven => 7,
            CardRank::Eight => 8,
            CardRank::Nine => 9,
            CardRank::Ten => 10,
            CardRank::Jack => 11,
            CardRank::Queen => 12,
            CardRank::King => 13,
            CardRank::Ace => 14,
        }
    }

    /// Inverse of [`CardRank::value`]. Returns `None` outside `2..=14`.
    pub fn from_value(value: u8) -> Option<Self> {
        CardRank::ALL.into_iter().find(|r| r.value() == value)
    }

    /// Display string (2..10, J, Q, K, A)
    pub fn as_str(self) -> &'static str {
        match self {
            CardRank::Two => "2",
            CardRank::Three => "3",
            CardRank::Four => "4",
            CardRank::Five => "5",
            CardRank::Six => "6",
            CardRank::Seven => "7",
            CardRank::Eight => "8",
            CardRank::Nine => "9",
            CardRank::Ten => "10",
            CardRank::Jack => "J",
            CardRank::Queen => "Q",
            CardRank::King => "K",
            CardRank::Ace => "A",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CardRank::Two => "Two",
            CardRank::Three => "Three",
            CardRank::Four => "Four",
            CardRank::Five => "Five",
            CardRank::Six => "Six",
            CardRank::Seven => "Seven",
            CardRank::Eight => "Eight",
            CardRank::Nine => "Nine",
            CardRank::Ten => "Ten",
            CardRank::Jack => "Jack",
            CardRank::Queen => "Queen",
            CardRank::King => "King",
            CardRank::Ace => "Ace",
        }
    }
}

impl FromStr for CardRank {
    type Err = CardParseError;

    /// Accepts both the short display form and the spelled-out names the
    /// remote deck API uses (`ACE`, `king`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let rank = match lower.as_str() {
            "a" | "ace" => CardRank::Ace,
            "k" | "king" => CardRank::King,
            "q" | "queen" => CardRank::Queen,
            "j" | "jack" => CardRank::Jack,
            other => other
                .parse::<u8>()
                .ok()
                .filter(|v| (2..=10).contains(v))
                .and_then(CardRank::from_value)
                .ok_or_else(|| CardParseError::Rank(s.to_string()))?,
        };
        Ok(rank)
    }
}

impl fmt::Display for CardRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSuit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl CardSuit {
    pub const ALL: [CardSuit; 4] = [
        CardSuit::Hearts,
        CardSuit::Diamonds,
        CardSuit::Clubs,
        CardSuit::Spades,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CardSuit::Hearts => "hearts",
            CardSuit::Diamonds => "diamonds",
            CardSuit::Clubs => "clubs",
            CardSuit::Spades => "spades",
        }
    }

    /// Get the suit as a character (♥, ♦, ♣, ♠)
    pub fn symbol(self) -> char {
        match self {
            CardSuit::Hearts => '♥',
            CardSuit::Diamonds => '♦',
            CardSuit::Clubs => '♣',
            CardSuit::Spades => '♠',
        }
    }

    pub fn initial(self) -> char {
        match self {
            CardSuit::Hearts => 'H',
            CardSuit::Diamonds => 'D',
            CardSuit::Clubs => 'C',
            CardSuit::Spades => 'S',
        }
    }

    /// Check if this is a red suit (hearts or diamonds)
    pub fn is_red(self) -> bool {
        matches!(self, CardSuit::Hearts | CardSuit::Diamonds)
    }
}

impl FromStr for CardSuit {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hearts" => Ok(CardSuit::Hearts),
            "diamonds" => Ok(CardSuit::Diamonds),
            "clubs" => Ok(CardSuit::Clubs),
            "spades" => Ok(CardSuit::Spades),
            _ => Err(CardParseError::Suit(s.to_string())),
        }
    }
}

impl fmt::Display for CardSuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    Rank(String),
    Suit(String),
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardParseError::Rank(r) => write!(f, "unknown card rank '{}'", r),
            CardParseError::Suit(s) => write!(f, "unknown card suit '{}'", s),
        }
    }
}

impl std::error::Error for CardParseError {}

/// An immutable playing card. Only [`Card::value`] takes part in comparisons.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "CardWire", try_from = "CardWire")]
pub struct Card {
    pub rank: CardRank,
    pub suit: CardSuit,
}

impl Card {
    /// Create a new card from rank and suit
    pub fn new(rank: CardRank, suit: CardSuit) -> Self {
        Card { rank, suit }
    }

    /// Parse a card from the raw rank/suit strings of a remote payload.
    pub fn parse(rank: &str, suit: &str) -> Result<Self, CardParseError> {
        Ok(Card::new(rank.parse()?, suit.parse()?))
    }

    pub fn value(self) -> u8 {
        self.rank.value()
    }

    /// Short code: display rank plus suit initial, e.g. "7H", "10S", "AD".
    pub fn code(self) -> String {
        format!("{}{}", self.rank.as_str(), self.suit.initial())
    }

    /// Get the card as a string like "A♣", "10♦", etc.
    pub fn short(self) -> String {
        format!("{}{}", self.rank.as_str(), self.suit.symbol())
    }

    pub fn is_red(self) -> bool {
        self.suit.is_red()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank.name(), self.suit.as_str())
    }
}

/// JSON shape of a card: `{ "suit": "hearts", "rank": "7", "code": "7H", "value": 7 }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CardWire {
    suit: CardSuit,
    rank: String,
    #[serde(default)]
    code: Option<String>,
    value: u8,
}

impl From<Card> for CardWire {
    fn from(c: Card) -> Self {
        CardWire {
            suit: c.suit,
            rank: c.rank.as_str().to_string(),
            code: Some(c.code()),
            value: c.value(),
        }
    }
}

impl TryFrom<CardWire> for Card {
    type Error = String;

    fn try_from(w: CardWire) -> Result<Self, Self::Error> {
        let rank: CardRank = w.rank.parse().map_err(|e: CardParseError| e.to_string())?;
        if rank.value() != w.value {
            return Err(format!(
                "card value {} does not match rank '{}'",
                w.value, w.rank
            ));
        }
        Ok(Card::new(rank, w.suit))
    }
}
