/// All semantic key actions in tack. Mouse gestures are routed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Board scrolling
    ScrollLeft,
    ScrollRight,
    ScrollStart,
    ScrollEnd,

    // Drag
    CancelDrag,

    // Panels
    ShowHelp,
    OpenSettings,
    ClosePanel,
    SettingsUp,
    SettingsDown,
    SettingsToggle,

    Quit,
    None,
}
