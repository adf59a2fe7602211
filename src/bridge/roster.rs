//! Roster synchronisation: one room per known contact.

use tracing::{debug, info, warn};

use crate::common::error::{BridgeError, BridgeResult};
use crate::common::types::RosterSource;

use super::orchestrator::Bridge;
use super::topic_index::{MappedAddress, ADDRESS_DELIMITER};

impl Bridge {
    /// Reconcile rooms with a freshly received roster.
    ///
    /// Indexes rooms created since the last sync, creates a room for every new
    /// contact and invites the configured users everywhere they are missing.
    pub async fn sync_roster(&mut self, rosters: &[RosterSource]) -> BridgeResult<()> {
        debug!("Roster update with {} source(s)", rosters.len());

        let roster = match rosters {
            [roster] => roster,
            _ => {
                return Err(BridgeError::RosterSources {
                    count: rosters.len(),
                })
            }
        };

        self.state.roster.replace(roster);

        let mapped = self.map_rooms_by_topic().await?;
        if mapped > 0 {
            info!("Mapped {} existing room(s) by topic", mapped);
        }

        for (address, entry) in &roster.entries {
            if !address.contains(ADDRESS_DELIMITER) {
                warn!("Skipping fake jid in roster: {}", address);
                continue;
            }
            let flag = self.classifier.flag();
            if !flag.is_empty() && address.starts_with(flag) {
                warn!("Skipping roster jid that looks like a group chat: {}", address);
                continue;
            }
            if self.state.is_disabled(address) {
                continue;
            }
            self.create_mapped_room(&MappedAddress::Direct(address.clone()), entry.name.as_deref())
                .await?;
        }

        debug!("Sending invitations");
        let mut invited = 0;
        for room in self.rooms.list_rooms().await? {
            invited += self.invite_missing(&room.id).await?;
        }

        info!(
            contacts = roster.entries.len(),
            mapped_rooms = self.state.index.len(),
            invitations = invited,
            "Roster update done"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::common::error::ErrorCategory;
    use crate::config::types::make_test_config;
    use crate::gateway::memory::{Harness, MemoryRoomGateway};

    fn roster() -> RosterSource {
        RosterSource::new("bridge@example.org")
    }

    #[tokio::test]
    async fn test_new_contact_gets_room_and_invite() {
        let config = make_test_config();
        let mut h = Harness::new(&config);

        h.bridge
            .sync_roster(&[roster().with_contact("alice@x", Some("Alice"))])
            .await
            .unwrap();

        let rooms = h.rooms.rooms_with_topic("alice@x");
        assert_eq!(rooms.len(), 1);
        assert_eq!(h.rooms.room(&rooms[0]).unwrap().name.as_deref(), Some("Alice"));
        assert_eq!(
            h.rooms.invites(),
            vec![(rooms[0].clone(), "@me:example.org".to_string())]
        );
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let config = make_test_config();
        let mut h = Harness::new(&config);
        let rosters = [roster()
            .with_contact("alice@x", Some("Alice"))
            .with_contact("bob@x", Some("Bob"))];

        h.bridge.sync_roster(&rosters).await.unwrap();
        let created = h.rooms.created_count();
        let invites = h.rooms.invites().len();

        h.bridge.sync_roster(&rosters).await.unwrap();

        assert_eq!(h.rooms.created_count(), created);
        assert_eq!(h.rooms.invites().len(), invites);
    }

    #[tokio::test]
    async fn test_fake_and_disabled_addresses_are_skipped() {
        let mut config = make_test_config();
        config.disabled_jids = vec!["muted@x".to_string()];
        let mut h = Harness::new(&config);

        h.bridge
            .sync_roster(&[roster()
                .with_contact("transport.example.org", Some("Gateway"))
                .with_contact("muted@x", Some("Muted"))
                .with_contact("carol@x", None)])
            .await
            .unwrap();

        assert_eq!(h.rooms.created_count(), 1);
        assert_eq!(h.rooms.rooms_with_topic("carol@x").len(), 1);
        // the snapshot still holds every entry
        assert!(h.bridge.state().roster.contains("muted@x"));
    }

    #[tokio::test]
    async fn test_flagged_roster_address_gets_no_room() {
        let config = make_test_config();
        let mut h = Harness::new(&config);

        h.bridge
            .sync_roster(&[roster()
                .with_contact("#lobby@conf.x", Some("Lobby"))
                .with_contact("dave@x", None)])
            .await
            .unwrap();

        assert_eq!(h.rooms.created_count(), 1);
        assert!(h.rooms.rooms_with_topic("#lobby@conf.x").is_empty());
        assert!(!h.bridge.state().is_group_chat("lobby@conf.x"));
    }

    #[tokio::test]
    async fn test_multiple_rosters_abort() {
        let config = make_test_config();
        let mut h = Harness::new(&config);

        let err = h
            .bridge
            .sync_roster(&[roster(), RosterSource::new("other@example.org")])
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::RosterSources { count: 2 }));
        assert_eq!(err.category(), ErrorCategory::Fatal);
        assert_eq!(h.rooms.created_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_roster_aborts() {
        let config = make_test_config();
        let mut h = Harness::new(&config);

        let err = h.bridge.sync_roster(&[]).await.unwrap_err();
        assert!(matches!(err, BridgeError::RosterSources { count: 0 }));
    }

    #[tokio::test]
    async fn test_existing_room_is_reused_and_unmapped_rooms_invited() {
        let config = make_test_config();
        let rooms = Arc::new(MemoryRoomGateway::new(config.bot_id()));
        let alice = rooms.add_room(Some("alice@x"), Some("Alice"), &["@me:example.org"]);
        let loose = rooms.add_room(None, None, &[]);
        let mut h = Harness::with_rooms(&config, rooms);

        h.bridge
            .sync_roster(&[roster().with_contact("alice@x", Some("Alice"))])
            .await
            .unwrap();

        assert_eq!(h.rooms.created_count(), 0);
        assert_eq!(
            h.bridge.state().index.lookup(&MappedAddress::Direct("alice@x".to_string())),
            Some(&alice)
        );
        assert_eq!(
            h.rooms.invites(),
            vec![(loose, "@me:example.org".to_string())]
        );
    }
}
