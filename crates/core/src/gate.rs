use crate::store::{StoreError, UsageStore};

/// Decides whether a one-use command may still run for a player, and records
/// or forgets that it ran.
pub struct UsageGate<'s> {
    store: &'s mut dyn UsageStore,
}

impl<'s> UsageGate<'s> {
    pub fn new(store: &'s mut dyn UsageStore) -> Self {
        Self { store }
    }

    /// Commands that aren't one-use always pass.
    pub fn can_run(&mut self, uuid: u128, command: &str, one_use: bool) -> Result<bool, StoreError> {
        if !one_use {
            return Ok(true);
        }
        Ok(!self.store.get(uuid, command)?.unwrap_or(false))
    }

    pub fn mark_run(&mut self, uuid: u128, command: &str) -> Result<(), StoreError> {
        self.store.put(uuid, command, true)
    }

    pub fn clear_run(&mut self, uuid: u128, command: &str) -> Result<(), StoreError> {
        self.store.remove(uuid, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUsageStore;

    const ALICE: u128 = 1;
    const BOB: u128 = 2;

    #[test]
    fn mark_then_clear_round_trip() {
        let mut store = MemoryUsageStore::new();
        let mut gate = UsageGate::new(&mut store);

        assert!(gate.can_run(ALICE, "giveItemSet2", true).unwrap());
        gate.mark_run(ALICE, "giveItemSet2").unwrap();
        assert!(!gate.can_run(ALICE, "giveItemSet2", true).unwrap());
        // Marking twice changes nothing
        gate.mark_run(ALICE, "giveItemSet2").unwrap();
        assert!(!gate.can_run(ALICE, "giveItemSet2", true).unwrap());

        gate.clear_run(ALICE, "giveItemSet2").unwrap();
        assert!(gate.can_run(ALICE, "giveItemSet2", true).unwrap());
        gate.clear_run(ALICE, "giveItemSet2").unwrap();
        assert!(gate.can_run(ALICE, "giveItemSet2", true).unwrap());
    }

    #[test]
    fn unlimited_commands_ignore_marks() {
        let mut store = MemoryUsageStore::new();
        let mut gate = UsageGate::new(&mut store);

        gate.mark_run(ALICE, "giveItemSet1").unwrap();
        assert!(gate.can_run(ALICE, "giveItemSet1", false).unwrap());
    }

    #[test]
    fn explicit_false_counts_as_not_run() {
        let mut store = MemoryUsageStore::new();
        store.put(ALICE, "giveItemSet2", false).unwrap();
        let mut gate = UsageGate::new(&mut store);
        assert!(gate.can_run(ALICE, "giveItemSet2", true).unwrap());
    }

    #[test]
    fn flags_are_per_player_and_per_command() {
        let mut store = MemoryUsageStore::new();
        let mut gate = UsageGate::new(&mut store);

        gate.mark_run(ALICE, "giveItemSet2").unwrap();
        assert!(gate.can_run(BOB, "giveItemSet2", true).unwrap());
        assert!(gate.can_run(ALICE, "giveItemSet3", true).unwrap());
    }
}
