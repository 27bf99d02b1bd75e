//! Collision predicates between the player box, pipes and floor
//!
//! Exact strict-overlap tests on pixel coordinates. The only tolerance is the
//! landed margin used to tell whether a crashed bird is resting on the floor.

use super::geometry::Rect;
use super::pipes::PipePair;
use super::state::Floor;
use crate::consts::LANDED_MARGIN;

/// Box overlaps either pipe of the pair
pub fn hits_pipe(player: &Rect, pipe: &PipePair) -> bool {
    player.intersects(&pipe.upper_rect()) || player.intersects(&pipe.lower_rect())
}

/// Box overlaps the floor band
pub fn hits_floor(player: &Rect, floor: &Floor) -> bool {
    player.intersects(&floor.rect())
}

/// Bottom edge within the landed margin of the floor's top edge
pub fn is_landed(player: &Rect, floor: &Floor) -> bool {
    player.bottom() >= floor.y - LANDED_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn pipe_at(x: f32) -> PipePair {
        PipePair {
            x,
            w: 52.0,
            gap_top: 150.0,
            gap: 120.0,
            pipe_h: 320.0,
            scored: false,
        }
    }

    #[test]
    fn test_inside_upper_pipe_hits() {
        let pipe = pipe_at(100.0);
        let player = Rect::new(110.0, 50.0, 34.0, 24.0);
        assert!(hits_pipe(&player, &pipe));
    }

    #[test]
    fn test_inside_lower_pipe_hits() {
        let pipe = pipe_at(100.0);
        let player = Rect::new(110.0, 300.0, 34.0, 24.0);
        assert!(hits_pipe(&player, &pipe));
    }

    #[test]
    fn test_through_gap_misses() {
        let pipe = pipe_at(100.0);
        let player = Rect::new(110.0, 200.0, 34.0, 24.0);
        assert!(!hits_pipe(&player, &pipe));
    }

    #[test]
    fn test_left_of_pipe_misses() {
        let pipe = pipe_at(100.0);
        let player = Rect::new(10.0, 50.0, 34.0, 24.0);
        assert!(!hits_pipe(&player, &pipe));
    }

    #[test]
    fn test_floor_contact() {
        let floor = Floor::new(&Settings::default());
        let above = Rect::new(57.0, floor.y - 30.0, 34.0, 24.0);
        let sunk = Rect::new(57.0, floor.y - 18.0, 34.0, 24.0);
        assert!(!hits_floor(&above, &floor));
        assert!(hits_floor(&sunk, &floor));
    }

    #[test]
    fn test_landed_margin() {
        let floor = Floor::new(&Settings::default());
        let resting = Rect::new(57.0, floor.y - 24.5, 34.0, 24.0);
        let airborne = Rect::new(57.0, floor.y - 26.0, 34.0, 24.0);
        assert!(is_landed(&resting, &floor));
        assert!(!is_landed(&airborne, &floor));
    }
}
