//! # Interaction
//!
//! Deciding which villager, if any, the player can talk to.

use crate::game::{Npc, Position};

/// Returns the first villager, in slice order, within `radius` of the player.
///
/// Order wins over distance: if two villagers are in reach the earlier one is
/// returned even when the later one is closer, so only one conversation can
/// ever be started by a single interaction.
///
/// # Examples
///
/// ```
/// use hamlet::{find_nearby, Npc, NpcColor, Position};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let npcs = vec![Npc::new("Blacksmith", Position::new(208.0, 208.0), NpcColor::Blue, &mut rng)];
///
/// assert!(find_nearby(Position::new(192.0, 224.0), &npcs, 50.0).is_some());
/// assert!(find_nearby(Position::new(400.0, 400.0), &npcs, 50.0).is_none());
/// ```
pub fn find_nearby(player: Position, npcs: &[Npc], radius: f32) -> Option<&Npc> {
    npcs.iter().find(|npc| npc.is_within(player, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::NpcColor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn npc(name: &str, x: f32, y: f32) -> Npc {
        let mut rng = StdRng::seed_from_u64(0);
        let mut npc = Npc::new(name, Position::origin(), NpcColor::Green, &mut rng);
        npc.set_position(Position::new(x, y));
        npc
    }

    #[test]
    fn test_match_within_radius() {
        let npcs = vec![npc("Blacksmith", 208.0, 208.0)];
        let found = find_nearby(Position::new(192.0, 224.0), &npcs, 50.0);
        assert_eq!(found.map(|n| n.name.as_str()), Some("Blacksmith"));
    }

    #[test]
    fn test_radius_is_inclusive() {
        let npcs = vec![npc("Merchant", 30.0, 40.0)];
        assert!(find_nearby(Position::origin(), &npcs, 50.0).is_some());
        assert!(find_nearby(Position::origin(), &npcs, 49.9).is_none());
    }

    #[test]
    fn test_none_when_everyone_is_far() {
        let npcs = vec![npc("Blacksmith", 208.0, 208.0), npc("Innkeeper", 400.0, 208.0)];
        assert!(find_nearby(Position::new(560.0, 400.0), &npcs, 50.0).is_none());
    }

    #[test]
    fn test_none_without_villagers() {
        assert!(find_nearby(Position::origin(), &[], 50.0).is_none());
    }

    #[test]
    fn test_first_in_order_wins_over_closest() {
        let npcs = vec![
            npc("Innkeeper", 40.0, 0.0),
            npc("Merchant", 5.0, 0.0),
        ];
        let found = find_nearby(Position::origin(), &npcs, 50.0);
        assert_eq!(found.map(|n| n.name.as_str()), Some("Innkeeper"));
    }

    #[test]
    fn test_skips_out_of_range_before_match() {
        let npcs = vec![
            npc("Blacksmith", 500.0, 0.0),
            npc("Merchant", 10.0, 10.0),
        ];
        let found = find_nearby(Position::origin(), &npcs, 50.0);
        assert_eq!(found.map(|n| n.name.as_str()), Some("Merchant"));
    }
}
