// Clutch and choke attribution: split a play's value among its participants
// and weight each share by the square root of leverage.

use crate::position::FieldingPosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Leverage above which a moment counts toward a player's high-leverage
/// sample.
pub const HIGH_LEVERAGE_MOMENT_LI: f64 = 1.5;

// ---------------------------------------------------------------------------
// Roles and attribution weights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClutchRole {
    Batter,
    Pitcher,
    Catcher,
    Fielder,
    Runner,
}

impl ClutchRole {
    pub fn is_offense(&self) -> bool {
        matches!(self, ClutchRole::Batter | ClutchRole::Runner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayType {
    HomeRun,
    Hit,
    /// Walk or hit by pitch.
    Walk,
    Strikeout,
    BattedOut,
    /// An out that needed a diving, leaping, or wall catch.
    DefensiveGem,
    DoublePlay,
    SacrificeFly,
    ReachedOnError,
    StolenBase,
    CaughtStealing,
    Pickoff,
    WildPitch,
    PassedBall,
}

impl PlayType {
    /// Share of the play's value owed to each role.
    ///
    /// Offense weights are positive and defense weights negative, so a play
    /// good for the offense credits the batter and charges the pitcher. The
    /// absolute weights of each play type sum to 1.
    pub fn attribution_weights(&self) -> &'static [(ClutchRole, f64)] {
        use ClutchRole::*;
        match self {
            PlayType::HomeRun => &[(Batter, 0.55), (Pitcher, -0.45)],
            PlayType::Hit => &[(Batter, 0.50), (Pitcher, -0.40), (Fielder, -0.10)],
            PlayType::Walk => &[(Batter, 0.40), (Pitcher, -0.50), (Catcher, -0.10)],
            PlayType::Strikeout => &[(Batter, 0.50), (Pitcher, -0.40), (Catcher, -0.10)],
            PlayType::BattedOut => &[(Batter, 0.45), (Pitcher, -0.35), (Fielder, -0.20)],
            PlayType::DefensiveGem => &[(Batter, 0.10), (Pitcher, -0.10), (Fielder, -0.80)],
            PlayType::DoublePlay => &[(Batter, 0.50), (Pitcher, -0.30), (Fielder, -0.20)],
            PlayType::SacrificeFly => &[(Batter, 0.60), (Pitcher, -0.30), (Fielder, -0.10)],
            PlayType::ReachedOnError => &[(Batter, 0.20), (Fielder, -0.80)],
            PlayType::StolenBase | PlayType::CaughtStealing => {
                &[(Runner, 0.60), (Catcher, -0.30), (Pitcher, -0.10)]
            }
            PlayType::Pickoff => &[(Runner, 0.50), (Pitcher, -0.30), (Catcher, -0.20)],
            PlayType::WildPitch => &[(Pitcher, -0.70), (Catcher, -0.30)],
            PlayType::PassedBall => &[(Catcher, -0.90), (Pitcher, -0.10)],
        }
    }

    /// Weight for `role`, or 0 when the role plays no part.
    pub fn weight_for(&self, role: ClutchRole) -> f64 {
        self.attribution_weights()
            .iter()
            .find(|(r, _)| *r == role)
            .map_or(0.0, |(_, w)| *w)
    }
}

// ---------------------------------------------------------------------------
// Playoff multiplier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayoffRound {
    WildCard,
    DivisionSeries,
    ChampionshipSeries,
    FinalSeries,
}

impl PlayoffRound {
    pub fn multiplier(&self) -> f64 {
        match self {
            PlayoffRound::WildCard => 1.25,
            PlayoffRound::DivisionSeries => 1.5,
            PlayoffRound::ChampionshipSeries => 1.75,
            PlayoffRound::FinalSeries => 2.0,
        }
    }
}

/// Stakes of the game a play happened in. The default is a regular-season
/// game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayoffContext {
    pub round: Option<PlayoffRound>,
    pub elimination_game: bool,
    pub clinch_game: bool,
}

impl PlayoffContext {
    /// 1.0 in the regular season; the round's multiplier in the playoffs,
    /// plus 0.5 for an elimination game and 0.25 for a clinching game.
    pub fn multiplier(&self) -> f64 {
        let Some(round) = self.round else {
            return 1.0;
        };
        let mut multiplier = round.multiplier();
        if self.elimination_game {
            multiplier += 0.5;
        }
        if self.clinch_game {
            multiplier += 0.25;
        }
        multiplier
    }
}

// ---------------------------------------------------------------------------
// Attribution
// ---------------------------------------------------------------------------

/// `base × skill × √LI`.
pub fn clutch_value(base_value: f64, skill_factor: f64, leverage_index: f64) -> f64 {
    base_value * skill_factor * leverage_index.sqrt()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub player_id: String,
    pub role: ClutchRole,
    /// Execution quality on the play, 1.0 for neutral.
    pub skill_factor: f64,
}

impl Participant {
    pub fn new(player_id: impl Into<String>, role: ClutchRole) -> Self {
        Participant {
            player_id: player_id.into(),
            role,
            skill_factor: 1.0,
        }
    }

    pub fn with_skill(mut self, skill_factor: f64) -> Self {
        self.skill_factor = skill_factor;
        self
    }

    /// Skill factor from how the ball was hit, for the batter and pitcher.
    /// Other roles are left unchanged.
    pub fn with_contact(self, batted_ball: BattedBall, offense_gained: bool) -> Self {
        match contact_modifier(self.role, offense_gained) {
            Some(modifier) => {
                let skill = modifier.skill_factor(batted_ball.contact_quality());
                self.with_skill(skill)
            }
            None => self,
        }
    }

    /// Skill factor from a fielder's throwing arm on plays decided by a
    /// throw. Other roles and plays are left unchanged.
    pub fn with_arm(self, play_type: PlayType, arm_factor: f64) -> Self {
        let throw_play = matches!(play_type, PlayType::Hit | PlayType::SacrificeFly);
        if self.role == ClutchRole::Fielder && throw_play {
            self.with_skill(arm_factor / AVERAGE_ARM_FACTOR)
        } else {
            self
        }
    }
}

// ---------------------------------------------------------------------------
// Contact quality and arm strength
// ---------------------------------------------------------------------------

/// Contact quality when nothing is known about the batted ball.
pub const DEFAULT_CONTACT_QUALITY: f64 = 0.5;

/// Arm factor of an average fielder.
pub const AVERAGE_ARM_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlyBallDepth {
    Shallow,
    Medium,
    Deep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundBallSpeed {
    Weak,
    Medium,
    Hard,
}

/// How the ball left the bat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattedBall {
    HomeRun,
    LineDrive,
    FlyBall(FlyBallDepth),
    GroundBall(GroundBallSpeed),
    Popup,
    Bunt,
}

impl BattedBall {
    /// Contact quality on a 0.1 (popup) to 1.0 (home run) scale.
    pub fn contact_quality(&self) -> f64 {
        match self {
            BattedBall::HomeRun => 1.0,
            BattedBall::LineDrive => 0.85,
            BattedBall::FlyBall(FlyBallDepth::Deep) => 0.75,
            BattedBall::FlyBall(FlyBallDepth::Medium) => 0.50,
            BattedBall::FlyBall(FlyBallDepth::Shallow) => 0.35,
            BattedBall::GroundBall(GroundBallSpeed::Hard) => 0.70,
            BattedBall::GroundBall(GroundBallSpeed::Medium) => 0.50,
            BattedBall::GroundBall(GroundBallSpeed::Weak) => 0.30,
            BattedBall::Popup => 0.10,
            BattedBall::Bunt => 0.30,
        }
    }
}

/// How contact quality scales a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactModifier {
    /// Harder contact, larger share.
    Multiply,
    /// Weaker contact, larger share.
    Inverse,
}

impl ContactModifier {
    pub fn apply(&self, contact_quality: f64) -> f64 {
        match self {
            ContactModifier::Multiply => contact_quality,
            ContactModifier::Inverse => 1.0 - contact_quality,
        }
    }

    /// [`apply`](Self::apply) normalized so default contact is 1.0.
    pub fn skill_factor(&self, contact_quality: f64) -> f64 {
        self.apply(contact_quality) / self.apply(DEFAULT_CONTACT_QUALITY)
    }
}

/// Contact modifier for a role, or `None` when contact does not bear on it.
///
/// When the offense gains, hard contact earns the batter more credit and the
/// pitcher more blame. When it loses, weak contact earns the batter more
/// blame and the pitcher more credit.
pub fn contact_modifier(role: ClutchRole, offense_gained: bool) -> Option<ContactModifier> {
    match role {
        ClutchRole::Batter | ClutchRole::Pitcher => Some(if offense_gained {
            ContactModifier::Multiply
        } else {
            ContactModifier::Inverse
        }),
        _ => None,
    }
}

/// Throwing arm on a 0–1 scale: the 0–100 rating when known, else the
/// position default, else average.
pub fn arm_factor(arm_rating: Option<u8>, position: Option<FieldingPosition>) -> f64 {
    if let Some(rating) = arm_rating {
        return f64::from(rating.min(100)) / 100.0;
    }
    match position {
        Some(FieldingPosition::Pitcher) => 0.35,
        Some(FieldingPosition::Catcher) => 0.70,
        Some(FieldingPosition::FirstBase) => 0.45,
        Some(FieldingPosition::SecondBase) => 0.60,
        Some(FieldingPosition::ShortStop) | Some(FieldingPosition::ThirdBase) => 0.80,
        Some(FieldingPosition::LeftField) => 0.55,
        Some(FieldingPosition::CenterField) => 0.65,
        Some(FieldingPosition::RightField) => 0.75,
        Some(FieldingPosition::DesignatedHitter) | None => AVERAGE_ARM_FACTOR,
    }
}

/// One participant's slice of a play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClutchShare {
    pub player_id: String,
    pub role: ClutchRole,
    /// Signed weight after splitting among participants sharing the role.
    pub weight: f64,
    /// `base value × weight`, before skill and leverage.
    pub base_share: f64,
    pub leverage_index: f64,
    pub clutch_value: f64,
}

/// Split `base_value` (signed from the offense's point of view, e.g. the
/// play's WPA) among `participants`.
///
/// Each role's weight is divided evenly among the participants holding that
/// role; a role with no participant leaves its share unassigned. Each share
/// is then scaled by skill factor, `√LI`, and the playoff multiplier.
pub fn attribute_clutch(
    play_type: PlayType,
    base_value: f64,
    leverage_index: f64,
    participants: &[Participant],
    playoff: &PlayoffContext,
) -> Vec<ClutchShare> {
    let stakes = playoff.multiplier();
    participants
        .iter()
        .map(|participant| {
            let holders = participants
                .iter()
                .filter(|p| p.role == participant.role)
                .count();
            let weight = play_type.weight_for(participant.role) / holders as f64;
            let base_share = base_value * weight;
            ClutchShare {
                player_id: participant.player_id.clone(),
                role: participant.role,
                weight,
                base_share,
                leverage_index,
                clutch_value: clutch_value(base_share, participant.skill_factor, leverage_index)
                    * stakes,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Season accumulation
// ---------------------------------------------------------------------------

/// A player's running clutch totals. Owned by the caller and updated one
/// share at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClutchAccumulator {
    pub clutch_points: f64,
    /// Accumulated negative value, stored as a positive magnitude.
    pub choke_points: f64,
    pub clutch_moments: u32,
    pub choke_moments: u32,
    pub total_li_exposure: f64,
    pub high_leverage_moments: u32,
}

impl ClutchAccumulator {
    pub fn with_share(self, share: &ClutchShare) -> Self {
        let mut next = self;
        if share.clutch_value > 0.0 {
            next.clutch_points += share.clutch_value;
            next.clutch_moments += 1;
        } else if share.clutch_value < 0.0 {
            next.choke_points += -share.clutch_value;
            next.choke_moments += 1;
        }
        next.total_li_exposure += share.leverage_index;
        if share.leverage_index > HIGH_LEVERAGE_MOMENT_LI {
            next.high_leverage_moments += 1;
        }
        next
    }

    pub fn net_clutch(&self) -> f64 {
        self.clutch_points - self.choke_points
    }

    pub fn tier(&self) -> ClutchTier {
        ClutchTier::from_net(self.net_clutch())
    }

    pub fn confidence(&self) -> ClutchConfidence {
        ClutchConfidence::from_sample(self.high_leverage_moments)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClutchTier {
    ChokeArtist,
    Shaky,
    Average,
    Reliable,
    Clutch,
    EliteClutch,
}

impl ClutchTier {
    pub fn from_net(net_clutch: f64) -> Self {
        if net_clutch >= 10.0 {
            ClutchTier::EliteClutch
        } else if net_clutch >= 5.0 {
            ClutchTier::Clutch
        } else if net_clutch >= 1.0 {
            ClutchTier::Reliable
        } else if net_clutch >= -1.0 {
            ClutchTier::Average
        } else if net_clutch >= -5.0 {
            ClutchTier::Shaky
        } else {
            ClutchTier::ChokeArtist
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            ClutchTier::EliteClutch => "Elite Clutch",
            ClutchTier::Clutch => "Clutch",
            ClutchTier::Reliable => "Reliable",
            ClutchTier::Average => "Average",
            ClutchTier::Shaky => "Shaky",
            ClutchTier::ChokeArtist => "Choke Artist",
        }
    }
}

impl fmt::Display for ClutchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// How far a clutch tier can be trusted, by high-leverage sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClutchConfidence {
    Low,
    Moderate,
    Good,
    High,
}

impl ClutchConfidence {
    pub fn from_sample(high_leverage_moments: u32) -> Self {
        match high_leverage_moments {
            n if n < 10 => ClutchConfidence::Low,
            n if n < 25 => ClutchConfidence::Moderate,
            n if n < 50 => ClutchConfidence::Good,
            _ => ClutchConfidence::High,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
