/// Logical key identity delivered by the input collaborator.
///
/// The engine never parses raw input events; front-ends translate into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Escape,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Backspace,
    Char(char),
}
