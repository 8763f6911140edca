#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Resize,

    // Search input
    InputChar(char),
    Backspace,
    ClearQuery,
    StartSearch,

    // List navigation
    CursorUp,
    CursorDown,
    GoTop,
    GoBottom,

    // Workflow
    SelectSong,
    ToggleLine,
    Proceed,
    Back,

    // Preview adjustments
    FetchCover,
    CycleColor,
    ToggleTextMode,
    CycleAlignment,
    ToggleVariant,
    Export,

    ToggleTheme,
}
