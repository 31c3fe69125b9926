use carousel::{DataSource, Item};

/// Everything the application model reacts to. Events carrying an epoch were
/// scheduled by the model itself and are dropped once that epoch is stale.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Swipe(usize),
    CommitCorrection(u64),
    Spin,
    SpinTick(u64),
    RevealLabels(u64),
    Flip(Option<usize>),
    SwitchSource(DataSource),
    ShowMap,
    HideMap,
    ConfigReload,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppOutput {
    Loaded { source: DataSource, count: usize },
    Settled(Item),
}
