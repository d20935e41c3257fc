use draftsim_engine::career::injury_probability;
use draftsim_engine::skill::{DEPTH_SKILL_MAX, DEPTH_SKILL_MIN};
use draftsim_engine::{
    BellCurveSkill, CorpusAggregator, DepthChartSkill, EmpiricalCdf, FrequencyTable, Position,
    SamplerCache, SkillSource, StatsAggregator, generate_game_stats, roll_for_injury,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

const SAMPLE_SIZE: usize = 5000;
const TOLERANCE: f64 = 0.025;

fn corpus() -> CorpusAggregator {
    CorpusAggregator::from_json(include_str!("../../data/athletes.sample.json"), 2025).unwrap()
}

fn rate(count: usize) -> f64 {
    f64::from(u32::try_from(count).expect("count fits"))
        / f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"))
}

#[test]
fn sampled_jerseys_track_corpus_frequencies() {
    let stats = corpus().aggregate().unwrap();
    let table = &stats.position_profile["WR"].jerseys;
    let total: u32 = table.values().sum();
    let cdf = EmpiricalCdf::build("WR.jerseys", table).unwrap();

    let mut rng = SmallRng::seed_from_u64(0x5EED);
    let mut seen: BTreeMap<u32, usize> = BTreeMap::new();
    for _ in 0..SAMPLE_SIZE {
        *seen.entry(*cdf.sample_with(&mut rng)).or_default() += 1;
    }

    assert!(seen.keys().all(|jersey| table.contains_key(jersey)));
    for (jersey, count) in table {
        let expected = f64::from(*count) / f64::from(total);
        let observed = rate(seen.get(jersey).copied().unwrap_or(0));
        assert!(
            (observed - expected).abs() <= TOLERANCE,
            "jersey {jersey} drifted: expected {expected:.4}, observed {observed:.4}"
        );
    }
}

#[test]
fn weighted_letters_match_configured_mass() {
    let table: FrequencyTable<String> = [("A", 4), ("B", 3), ("C", 2), ("D", 1)]
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    let cdf = EmpiricalCdf::build("letters", &table).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(10_000);
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for _ in 0..SAMPLE_SIZE {
        *seen.entry(cdf.sample_with(&mut rng).as_str()).or_default() += 1;
    }
    for (letter, expected) in [("A", 0.4), ("B", 0.3), ("C", 0.2), ("D", 0.1)] {
        let observed = rate(seen[letter]);
        assert!(
            (observed - expected).abs() <= TOLERANCE,
            "{letter} drifted: observed {observed:.4}"
        );
    }
}

#[test]
fn injury_rate_tracks_age_and_position() {
    for (age, position) in [
        (36, Position::RunningBack),
        (27, Position::WideReceiver),
        (23, Position::Quarterback),
        (31, Position::Kicker),
    ] {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(age));
        let injuries = (0..SAMPLE_SIZE)
            .filter(|_| roll_for_injury(age, position, &mut rng).is_some())
            .count();
        let expected = injury_probability(age, position);
        let observed = rate(injuries);
        assert!(
            (observed - expected).abs() <= TOLERANCE,
            "{position} at {age}: expected {expected:.4}, observed {observed:.4}"
        );
    }
}

#[test]
fn running_backs_get_hurt_more_than_kickers() {
    let mut rng = SmallRng::seed_from_u64(77);
    let mut count = |position| {
        (0..SAMPLE_SIZE)
            .filter(|_| roll_for_injury(30, position, &mut rng).is_some())
            .count()
    };
    let running_back = count(Position::RunningBack);
    let quarterback = count(Position::Quarterback);
    let kicker = count(Position::Kicker);
    assert!(running_back > quarterback, "{running_back} <= {quarterback}");
    assert!(quarterback > kicker, "{quarterback} <= {kicker}");
}

#[test]
fn depth_chart_skill_centres_on_slot_mean() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xDE97);
    let n = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    let total = 6;
    let mut previous = f64::INFINITY;
    for slot in 0..total {
        let model = DepthChartSkill::new(slot, total);
        let draws: Vec<f64> = (0..SAMPLE_SIZE).map(|_| model.draw_skill(&mut rng)).collect();
        assert!(
            draws
                .iter()
                .all(|skill| (DEPTH_SKILL_MIN..=DEPTH_SKILL_MAX).contains(skill))
        );
        let mean = draws.iter().sum::<f64>() / n;
        assert!(
            (mean - model.base_mean()).abs() <= TOLERANCE,
            "slot {slot}: mean {mean:.4} vs {:.4}",
            model.base_mean()
        );
        assert!(mean < previous, "slot {slot} not below the slot above it");
        previous = mean;
    }
}

#[test]
fn bell_curve_skill_spreads_as_configured() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xBE11);
    let source = BellCurveSkill::default();
    let draws: Vec<f64> = (0..SAMPLE_SIZE).map(|_| source.draw_skill(&mut rng)).collect();
    let n = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    let mean = draws.iter().sum::<f64>() / n;
    let variance = draws.iter().map(|skill| (skill - mean).powi(2)).sum::<f64>() / n;
    assert!((mean - 0.5).abs() <= TOLERANCE, "mean {mean:.4}");
    assert!((variance.sqrt() - 0.2).abs() <= TOLERANCE, "sd {:.4}", variance.sqrt());
}

#[test]
fn per_game_volume_sits_mid_range() {
    let mut rng = SmallRng::seed_from_u64(0x600D);
    let n = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    let mut attempts = 0.0;
    let mut carries = 0.0;
    for _ in 0..SAMPLE_SIZE {
        let qb = generate_game_stats(Position::Quarterback, &mut rng);
        let rb = generate_game_stats(Position::RunningBack, &mut rng);
        attempts += f64::from(qb.passing_attempts);
        carries += f64::from(rb.rushing_attempts);
    }
    assert!((attempts / n - 35.0).abs() < 0.5, "qb attempts {}", attempts / n);
    assert!((carries / n - 18.5).abs() < 0.5, "rb carries {}", carries / n);
}

#[test]
fn sampler_cache_draws_only_corpus_values() {
    let cache = SamplerCache::new(corpus());
    let bundle = cache.bundle().unwrap();
    let stats = cache.aggregator().aggregate().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for position in Position::ALL {
        let profile = &stats.position_profile[position.code()];
        let samplers = bundle.position(position).unwrap();
        for _ in 0..200 {
            let draw = samplers.draw(&mut rng);
            assert!(profile.heights.contains_key(&draw.height));
            assert!(profile.weights.contains_key(&draw.weight));
            assert!(profile.ages.contains_key(&draw.age));
            assert!(profile.years_of_experience.contains_key(&draw.years_of_experience));
        }
    }
}
