use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// An attribute value that does not name a known token.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct TokenError {
    pub kind: &'static str,
    pub value: String,
}

impl TokenError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_owned() }
    }
}

fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Top,
    Bottom,
    Outerwear,
    Footwear,
    Dress,
}

impl Category {
    pub const ALL: [Category; 5] =
        [Self::Top, Self::Bottom, Self::Outerwear, Self::Footwear, Self::Dress];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Outerwear => "outerwear",
            Self::Footwear => "footwear",
            Self::Dress => "dress",
        }
    }

    /// Whether an item of this category can be worn together with one of `other`.
    ///
    /// Distinct categories pair up, except that a dress already covers the
    /// top and bottom slots.
    pub fn complements(self, other: Category) -> bool {
        if self == other {
            return false;
        }
        !matches!(
            (self, other),
            (Self::Dress, Self::Top)
                | (Self::Dress, Self::Bottom)
                | (Self::Top, Self::Dress)
                | (Self::Bottom, Self::Dress)
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "top" | "tops" => Ok(Self::Top),
            "bottom" | "bottoms" => Ok(Self::Bottom),
            "outerwear" | "jacket" | "coat" => Ok(Self::Outerwear),
            "footwear" | "shoes" => Ok(Self::Footwear),
            "dress" | "dresses" => Ok(Self::Dress),
            _ => Err(TokenError::new("category", value)),
        }
    }
}

/// Slot of a color on the six-step hue wheel, or neutral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFamily {
    Hue(u8),
    Neutral,
}

const HUE_STEPS: u8 = 6;

impl ColorFamily {
    /// Same hue slot or one step away on the wheel.
    pub fn is_adjacent(self, other: ColorFamily) -> bool {
        match (self, other) {
            (Self::Hue(a), Self::Hue(b)) => {
                let distance = a.abs_diff(b);
                distance <= 1 || distance == HUE_STEPS - 1
            }
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Navy,
    Black,
    White,
    Gray,
    Beige,
    Brown,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Navy => "navy",
            Self::Black => "black",
            Self::White => "white",
            Self::Gray => "gray",
            Self::Beige => "beige",
            Self::Brown => "brown",
        }
    }

    pub fn family(self) -> ColorFamily {
        match self {
            Self::Red | Self::Pink => ColorFamily::Hue(0),
            Self::Orange => ColorFamily::Hue(1),
            Self::Yellow => ColorFamily::Hue(2),
            Self::Green => ColorFamily::Hue(3),
            Self::Blue | Self::Navy => ColorFamily::Hue(4),
            Self::Purple => ColorFamily::Hue(5),
            Self::Black | Self::White | Self::Gray | Self::Beige | Self::Brown => {
                ColorFamily::Neutral
            }
        }
    }

    pub fn is_neutral(self) -> bool {
        self.family() == ColorFamily::Neutral
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "red" => Ok(Self::Red),
            "orange" => Ok(Self::Orange),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            "purple" => Ok(Self::Purple),
            "pink" => Ok(Self::Pink),
            "navy" => Ok(Self::Navy),
            "black" => Ok(Self::Black),
            "white" => Ok(Self::White),
            "gray" | "grey" => Ok(Self::Gray),
            "beige" => Ok(Self::Beige),
            "brown" => Ok(Self::Brown),
            _ => Err(TokenError::new("color", value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Solid,
    Striped,
    Plaid,
    Checked,
    Floral,
    PolkaDot,
    Graphic,
    AnimalPrint,
}

impl Pattern {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Striped => "striped",
            Self::Plaid => "plaid",
            Self::Checked => "checked",
            Self::Floral => "floral",
            Self::PolkaDot => "polka_dot",
            Self::Graphic => "graphic",
            Self::AnimalPrint => "animal_print",
        }
    }

    pub fn is_solid(self) -> bool {
        self == Self::Solid
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pattern {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "solid" | "plain" => Ok(Self::Solid),
            "striped" | "stripes" | "stripe" => Ok(Self::Striped),
            "plaid" | "tartan" => Ok(Self::Plaid),
            "checked" | "check" | "checkered" => Ok(Self::Checked),
            "floral" => Ok(Self::Floral),
            "polka_dot" | "polkadot" | "dotted" => Ok(Self::PolkaDot),
            "graphic" | "print" => Ok(Self::Graphic),
            "animal_print" | "animal" | "leopard" => Ok(Self::AnimalPrint),
            _ => Err(TokenError::new("pattern", value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Casual,
    Formal,
    Business,
    Sporty,
    Streetwear,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Formal => "formal",
            Self::Business => "business",
            Self::Sporty => "sporty",
            Self::Streetwear => "streetwear",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "casual" => Ok(Self::Casual),
            "formal" => Ok(Self::Formal),
            "business" | "smart" => Ok(Self::Business),
            "sporty" | "sport" | "athletic" => Ok(Self::Sporty),
            "streetwear" | "street" => Ok(Self::Streetwear),
            _ => Err(TokenError::new("style", value)),
        }
    }
}

/// A single piece of clothing. Never mutated once it is part of a catalog.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub primary_color: Color,
    pub secondary_colors: Vec<Color>,
    pub pattern: Pattern,
    pub style: Style,
    /// Image reference as written in the catalog source.
    pub image: Option<String>,
    /// Image location on disk, set when the catalog resolves images.
    pub image_path: Option<PathBuf>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        primary_color: Color,
        pattern: Pattern,
        style: Style,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: ItemId(id),
            category,
            primary_color,
            secondary_colors: Vec::new(),
            pattern,
            style,
            image: None,
            image_path: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Secondary colors keep their first-seen order; duplicates and the
    /// primary color are dropped.
    pub fn with_secondary_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        let mut secondary: Vec<Color> = Vec::new();
        for color in colors {
            if color != self.primary_color && !secondary.contains(&color) {
                secondary.push(color);
            }
        }
        self.secondary_colors = secondary;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
