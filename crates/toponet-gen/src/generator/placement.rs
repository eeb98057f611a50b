//! Sequential rejection sampling of agent positions.
use rand::Rng;
use rand::rngs::StdRng;
use toponet_core::Position;

use super::{GenerateError, GeneratorConfig};

/// Places `config.num_agents` agents inside the zone.
///
/// The first agent is always accepted. Each later draw is accepted only if it
/// lies strictly within `config.critical_radius()` of an agent already
/// placed, so the accepted set stays connected. Rejected draws are discarded
/// and do not consume an id.
///
/// # Errors
///
/// [`GenerateError::PlacementExhausted`] if `config.max_attempts` draws in a
/// row are rejected for the same agent.
pub fn place_agents(
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<Vec<Position>, GenerateError> {
    let reach = config.critical_radius();
    let mut placed: Vec<Position> = Vec::with_capacity(config.num_agents);

    while placed.len() < config.num_agents {
        let agent = placed.len() + 1;
        let accepted = (1..=config.max_attempts).find_map(|attempt| {
            let candidate = draw_position(config.zone_range, rng);
            in_range(&placed, &candidate, reach).then_some((candidate, attempt))
        });
        let Some((position, attempts)) = accepted else {
            return Err(GenerateError::PlacementExhausted {
                agent,
                attempts: config.max_attempts,
            });
        };
        if attempts > 1 {
            tracing::trace!(agent, attempts, "agent placed after rejected draws");
        }
        placed.push(position);
    }

    Ok(placed)
}

/// Returns `true` if `candidate` may join `placed`.
pub fn in_range(placed: &[Position], candidate: &Position, reach: f64) -> bool {
    placed.is_empty() || placed.iter().any(|p| p.distance(candidate) < reach)
}

fn draw_position(zone_range: f64, rng: &mut StdRng) -> Position {
    Position::new(rng.gen_range(0.0..zone_range), rng.gen_range(0.0..zone_range))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use rand::SeedableRng;

    use super::*;
    use crate::generator::Preset;

    #[test]
    fn first_agent_is_always_in_range() {
        assert!(in_range(&[], &Position::new(0.9, 0.9), 0.01));
    }

    #[test]
    fn reach_is_strict() {
        let placed = [Position::new(0.0, 0.0)];
        assert!(in_range(&placed, &Position::new(0.05, 0.0), 0.06));
        assert!(!in_range(&placed, &Position::new(0.06, 0.0), 0.06));
    }

    #[test]
    fn every_later_agent_is_near_an_earlier_one() {
        let config = Preset::Default.config(7);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let positions = place_agents(&config, &mut rng).expect("places");
        assert_eq!(positions.len(), config.num_agents);
        for (i, p) in positions.iter().enumerate().skip(1) {
            assert!(
                in_range(&positions[..i], p, config.critical_radius()),
                "agent {} is out of range",
                i + 1
            );
        }
        for p in &positions {
            assert!((0.0..config.zone_range).contains(&p.x));
            assert!((0.0..config.zone_range).contains(&p.y));
        }
    }

    #[test]
    fn tiny_reach_exhausts_attempts() {
        let config = GeneratorConfig {
            scale_factor: 1e-9,
            max_attempts: 50,
            ..Preset::Default.config(3)
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let err = place_agents(&config, &mut rng).expect_err("cannot place");
        assert!(matches!(
            err,
            GenerateError::PlacementExhausted {
                agent: 2,
                attempts: 50
            }
        ));
    }
}
