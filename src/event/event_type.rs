/// Identifier carried by the Global component of every event.
///
/// The named variants are the occurrences the turn-based game layer emits.
/// Anything else goes through `Custom`.
#[derive(
    Debug, Clone, PartialEq, Hash, Eq, strum::EnumString, strum::Display, Default, PartialOrd, Ord,
)]
pub enum EventType {
    #[default]
    TurnStart,
    TurnEnd,
    StoneSwap,
    Attack,
    Custom(String), // 拡張性のために残す
}

impl EventType {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}
