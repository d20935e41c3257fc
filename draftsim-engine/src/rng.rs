//! Deterministic RNG streams derived from a single user seed.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Bundle of domain-separated RNG streams.
///
/// Each concern draws from its own stream so that adding draws in one place
/// (say, an extra injury roll) never shifts the values produced elsewhere.
#[derive(Debug)]
pub struct RngBundle {
    seed: u64,
    league: RefCell<CountingRng<ChaCha8Rng>>,
    ids: RefCell<CountingRng<ChaCha8Rng>>,
    attributes: RefCell<CountingRng<ChaCha8Rng>>,
    skill: RefCell<CountingRng<ChaCha8Rng>>,
    career: RefCell<CountingRng<ChaCha8Rng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            league: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"league"))),
            ids: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"ids"))),
            attributes: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"attributes"))),
            skill: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"skill"))),
            career: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"career"))),
        }
    }

    /// The seed this bundle was derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Access the league-assembly RNG stream.
    #[must_use]
    pub fn league(&self) -> RefMut<'_, CountingRng<ChaCha8Rng>> {
        self.league.borrow_mut()
    }

    /// Access the identifier RNG stream.
    #[must_use]
    pub fn ids(&self) -> RefMut<'_, CountingRng<ChaCha8Rng>> {
        self.ids.borrow_mut()
    }

    /// Access the player-attribute RNG stream.
    #[must_use]
    pub fn attributes(&self) -> RefMut<'_, CountingRng<ChaCha8Rng>> {
        self.attributes.borrow_mut()
    }

    /// Access the skill RNG stream.
    #[must_use]
    pub fn skill(&self) -> RefMut<'_, CountingRng<ChaCha8Rng>> {
        self.skill.borrow_mut()
    }

    /// Access the career simulation RNG stream.
    #[must_use]
    pub fn career(&self) -> RefMut<'_, CountingRng<ChaCha8Rng>> {
        self.career.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha8Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
