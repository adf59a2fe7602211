//! Presence relay into the control room.

use tracing::{debug, error};

use crate::common::error::BridgeResult;
use crate::common::messages::PresenceUpdate;

use super::orchestrator::Bridge;
use super::topic_index::SpecialRoom;

impl Bridge {
    /// Post an availability notice for a roster contact in the control room.
    pub async fn handle_presence(&mut self, update: PresenceUpdate) -> BridgeResult<()> {
        if self.state.is_disabled(&update.from) {
            return Ok(());
        }
        if !self.config.send_presences_to_control {
            return Ok(());
        }

        if !self.state.roster.contains(&update.from) {
            error!(
                "Presence {} from {} who is not in the roster, requesting it again",
                update.kind.as_str(),
                update.from
            );
            self.contacts.request_roster().await?;
            return Ok(());
        }

        let Some(control) = self.state.special.get(SpecialRoom::Control) else {
            debug!("No control room yet, dropping presence of {}", update.from);
            return Ok(());
        };

        let name = self.state.roster.display_name(&update.from);
        let notice = format!("{} {} ({})", name, update.kind.as_str(), update.from);
        self.rooms.send_notice(control, &notice).await?;
        Ok(())
    }
}
