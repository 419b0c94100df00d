// Use cases layer: state mirror, action sequencing and drag and drop.

pub mod card_operations;
pub mod drag_drop;
pub mod player_state;

#[cfg(test)]
pub(crate) mod test_support;

pub use card_operations::{CardOperationsManager, OperationSettings, TurnOutcome};
pub use drag_drop::{
    DragDropManager, DraggableCard, DropOutcome, DropTarget, DropZone, PointerButton,
    PointerResponse,
};
pub use player_state::{GameStateSummary, PlayerStateManager, TeamSummary};
