// Domain layer: battle entities, log types, geometry and ports.

pub mod action;
pub mod battle;
pub mod errors;
pub mod geometry;
pub mod log;
pub mod ports;

pub use action::{ActionOutcome, ActionType, ApiResponse, BattleAction, IgnoreReason};
pub use battle::{BattleState, Card, CardInDeck, Character, Player, PlayerDeck, Team};
pub use errors::{ApiError, BattleError};
pub use geometry::{Point, Rect};
pub use log::{BattleLogEntry, CardBattleLogTarget, Impact, ImpactKind, ImpactMeta};
pub use ports::{Animator, BattleApi, CardActions, LogResponse, Pacer};
