//! Player record materialization from the sampler bundle.
use chrono::Datelike;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::error::SynthError;
use crate::position::Position;
use crate::rng::RngBundle;
use crate::sampler::{AttributeDraw, SamplerBundle};
use crate::skill::SkillSource;

/// Supplies the year that careers are measured against.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}

/// Reads the year from the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// A clock pinned to one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

/// Hands out identifiers for players, teams and league structure.
pub trait IdSource: Send + Sync {
    fn next_id(&self, rng: &mut dyn RngCore) -> Uuid;
}

/// Version 4 UUIDs whose random bytes come from the caller's RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self, rng: &mut dyn RngCore) -> Uuid {
        let mut bytes = [0_u8; 16];
        rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Predictable identifiers counting up from 1; ignores the RNG.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdSource for SequentialIds {
    fn next_id(&self, _rng: &mut dyn RngCore) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u64_pair(0, n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    #[default]
    Active,
}

/// A generated player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    pub team_id: Uuid,
    pub jersey: u32,
    pub height: u32,
    pub weight: u32,
    pub age: u32,
    pub years_of_experience: u32,
    pub draft_year: i32,
    pub status: PlayerStatus,
    pub skill: f64,
}

impl PlayerProfile {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Builds players for a given team from the cached distributions.
pub struct PlayerFactory<'a> {
    bundle: &'a SamplerBundle,
    clock: &'a dyn Clock,
    ids: &'a dyn IdSource,
}

impl<'a> PlayerFactory<'a> {
    #[must_use]
    pub fn new(bundle: &'a SamplerBundle, clock: &'a dyn Clock, ids: &'a dyn IdSource) -> Self {
        Self { bundle, clock, ids }
    }

    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.clock.current_year()
    }

    /// Draw a complete player at `position`.
    ///
    /// The draft year is the current year minus the sampled years of experience.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::UnknownPosition`] when the bundle has no profile for `position`.
    pub fn create_player(
        &self,
        position: Position,
        team_id: Uuid,
        skill: &dyn SkillSource,
        rng: &mut dyn RngCore,
    ) -> Result<PlayerProfile, SynthError> {
        let samplers = self
            .bundle
            .position(position)
            .ok_or_else(|| SynthError::UnknownPosition(position.code().to_string()))?;

        let id = self.ids.next_id(rng);
        let first_name = self.bundle.first_names().sample_with(rng).clone();
        let last_name = self.bundle.last_names().sample_with(rng).clone();
        let attributes = samplers.draw(rng);
        let skill = skill.draw_skill(rng);
        Ok(self.assemble(id, position, team_id, first_name, last_name, attributes, skill))
    }

    /// Like [`Self::create_player`], but identifiers, attributes and skill each
    /// come from their own stream of `rngs`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::UnknownPosition`] when the bundle has no profile for `position`.
    pub fn create_player_from_streams(
        &self,
        position: Position,
        team_id: Uuid,
        skill: &dyn SkillSource,
        rngs: &RngBundle,
    ) -> Result<PlayerProfile, SynthError> {
        let samplers = self
            .bundle
            .position(position)
            .ok_or_else(|| SynthError::UnknownPosition(position.code().to_string()))?;

        let id = self.ids.next_id(&mut *rngs.ids());
        let (first_name, last_name, attributes) = {
            let mut rng = rngs.attributes();
            let first_name = self.bundle.first_names().sample_with(&mut *rng).clone();
            let last_name = self.bundle.last_names().sample_with(&mut *rng).clone();
            (first_name, last_name, samplers.draw(&mut *rng))
        };
        let skill = skill.draw_skill(&mut *rngs.skill());
        Ok(self.assemble(id, position, team_id, first_name, last_name, attributes, skill))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        id: Uuid,
        position: Position,
        team_id: Uuid,
        first_name: String,
        last_name: String,
        attributes: AttributeDraw,
        skill: f64,
    ) -> PlayerProfile {
        let draft_year = self
            .clock
            .current_year()
            .saturating_sub_unsigned(attributes.years_of_experience);

        let player = PlayerProfile {
            id,
            first_name,
            last_name,
            position,
            team_id,
            jersey: attributes.jersey,
            height: attributes.height,
            weight: attributes.weight,
            age: attributes.age,
            years_of_experience: attributes.years_of_experience,
            draft_year,
            status: PlayerStatus::Active,
            skill,
        };
        log::debug!(
            "created {} {} #{} (yoe {}, skill {:.3})",
            player.position,
            player.full_name(),
            player.jersey,
            player.years_of_experience,
            player.skill
        );
        player
    }

    /// Like [`Self::create_player`] but keyed by a position abbreviation.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::UnknownPosition`] for unrecognized codes or missing profiles.
    pub fn create_player_for_code(
        &self,
        code: &str,
        team_id: Uuid,
        skill: &dyn SkillSource,
        rng: &mut dyn RngCore,
    ) -> Result<PlayerProfile, SynthError> {
        let position =
            Position::from_code(code).ok_or_else(|| SynthError::UnknownPosition(code.to_string()))?;
        self.create_player(position, team_id, skill, rng)
    }
}
