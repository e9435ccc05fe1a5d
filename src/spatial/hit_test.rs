use super::events::ProEvent;
use super::field::FieldPoint;
use crate::config::HitTestSettings;

/// Index of the event a review tap refers to.
///
/// Destinations win over throw lines. Among several candidates the most
/// recently recorded event is picked.
pub fn hit_test(events: &[ProEvent], tap: &FieldPoint, settings: &HitTestSettings) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, event) in events.iter().enumerate() {
        let distance = tap.distance_to(&event.destination);
        if distance > settings.destination_radius {
            continue;
        }
        match best {
            Some((_, nearest)) if distance > nearest => {}
            _ => best = Some((idx, distance)),
        }
    }
    if let Some((idx, _)) = best {
        return Some(idx);
    }

    events.iter().enumerate().rev().find_map(|(idx, event)| {
        let origin = event.origin?;
        (distance_to_segment(tap, &origin, &event.destination) <= settings.segment_threshold).then_some(idx)
    })
}

/// Perpendicular distance to the segment, clamped to its end points
pub fn distance_to_segment(point: &FieldPoint, start: &FieldPoint, end: &FieldPoint) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_squared = dx * dx + dy * dy;
    if length_squared == 0.0 {
        return point.distance_to(start);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_squared).clamp(0.0, 1.0);
    let projection = FieldPoint {
        x: start.x + t * dx,
        y: start.y + t * dy,
    };
    point.distance_to(&projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::ProEventType;

    fn at(x: f64, y: f64) -> FieldPoint {
        FieldPoint::new(x, y)
    }

    fn pass(from: FieldPoint, to: FieldPoint) -> ProEvent {
        ProEvent::throw(ProEventType::Pass, "a", Some("b"), from, to)
    }

    #[test]
    fn test_destination_beats_segment() {
        let events = vec![pass(at(0.2, 0.2), at(0.2, 0.8)), pass(at(0.0, 0.5), at(0.23, 0.5))];
        let settings = HitTestSettings::default();

        assert_eq!(hit_test(&events, &at(0.21, 0.5), &settings), Some(1));
    }

    #[test]
    fn test_nearest_destination_then_most_recent_on_tie() {
        let events = vec![
            pass(at(0.1, 0.1), at(0.5, 0.5)),
            pass(at(0.1, 0.1), at(0.52, 0.5)),
            pass(at(0.1, 0.1), at(0.5, 0.5)),
        ];
        let settings = HitTestSettings::default();

        assert_eq!(hit_test(&events, &at(0.5, 0.5), &settings), Some(2));
        assert_eq!(hit_test(&events, &at(0.53, 0.5), &settings), Some(1));
    }

    #[test]
    fn test_segment_uses_last_match_and_clamps() {
        let events = vec![pass(at(0.1, 0.1), at(0.1, 0.9)), pass(at(0.1, 0.2), at(0.1, 0.8))];
        let settings = HitTestSettings::default();

        assert_eq!(hit_test(&events, &at(0.11, 0.5), &settings), Some(1));
        assert_eq!(hit_test(&events, &at(0.11, 0.15), &settings), Some(0));
        assert_eq!(hit_test(&events, &at(0.5, 0.5), &settings), None);
    }

    #[test]
    fn test_segment_distance_clamps_projection() {
        let d = distance_to_segment(&at(0.0, 0.0), &at(0.3, 0.4), &at(0.6, 0.8));
        assert!((d - 0.5).abs() < 1e-12);
        let zero_length = distance_to_segment(&at(0.0, 0.0), &at(0.3, 0.4), &at(0.3, 0.4));
        assert!((zero_length - 0.5).abs() < 1e-12);
    }
}
