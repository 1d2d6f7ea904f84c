use super::snapshot::FormSnapshot;

/// Side effects the form hands off to its host.
#[cfg_attr(test, mockall::automock)]
pub trait FormHooks {
    /// Asked before unsaved changes are discarded by a clear or a load.
    fn confirm_discard(&mut self) -> bool {
        false
    }

    fn on_save(&mut self, _snapshot: &FormSnapshot) {}

    fn on_clear(&mut self) {}
}
