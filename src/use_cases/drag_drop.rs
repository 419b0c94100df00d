// Pointer-driven card movement. Resolves a drag gesture into a play, a discard, or a cancelled
// drop. Holds no rendering; positions and visual affordances are plain values the UI reads.

use crate::domain::{ActionOutcome, BattleError, CardActions, CardInDeck, Point, Rect, Team};
use tracing::debug;

const LIFTED_ALPHA: f32 = 0.8;
const LIFTED_SCALE_FACTOR: f32 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerResponse {
    DragStarted,
    // Secondary action: caller opens a read-only detail view for this card.
    ShowDetails(CardInDeck),
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Character { team: Team, character_index: usize },
    Discard,
}

/// Hit-testable area mapped to a drop target. Zones should not overlap; the first registered
/// match wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZone {
    pub target: DropTarget,
    pub area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    // Caller detaches the card from the hand's visual list.
    Played { card_id: String },
    Discarded { card_id: String },
    // Card stays in hand; the hand's next layout pass puts it back in its slot.
    Cancelled,
}

/// A card sprite the manager can move.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggableCard {
    pub card: CardInDeck,
    // Position in the card's container space.
    pub position: Point,
    // The container's origin in global space.
    pub container_origin: Point,
    pub alpha: f32,
    pub scale: f32,
}

impl DraggableCard {
    pub fn new(card: CardInDeck, position: Point, container_origin: Point) -> Self {
        Self {
            card,
            position,
            container_origin,
            alpha: 1.0,
            scale: 1.0,
        }
    }

    fn to_local(&self, global: Point) -> Point {
        global - self.container_origin
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct VisualRestore {
    alpha: f32,
    scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        card_id: String,
        offset: Point,
        restore: VisualRestore,
    },
}

#[derive(Debug)]
pub struct DragDropManager {
    cards: Vec<DraggableCard>,
    zones: Vec<DropZone>,
    state: DragState,
    enabled: bool,
}

impl Default for DragDropManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DragDropManager {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            zones: Vec::new(),
            state: DragState::Idle,
            enabled: true,
        }
    }

    /// Registers a card for dragging, replacing any entry with the same instance id.
    pub fn make_card_draggable(&mut self, card: DraggableCard) {
        self.remove_card(&card.card.card_id);
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, card_id: &str) -> Option<DraggableCard> {
        let index = self
            .cards
            .iter()
            .position(|entry| entry.card.card_id == card_id)?;
        Some(self.cards.remove(index))
    }

    pub fn card(&self, card_id: &str) -> Option<&DraggableCard> {
        self.cards.iter().find(|entry| entry.card.card_id == card_id)
    }

    fn card_mut(&mut self, card_id: &str) -> Option<&mut DraggableCard> {
        self.cards
            .iter_mut()
            .find(|entry| entry.card.card_id == card_id)
    }

    pub fn register_drop_zone(&mut self, zone: DropZone) {
        self.zones.push(zone);
    }

    pub fn clear_drop_zones(&mut self) {
        self.zones.clear();
    }

    /// While true, the caller routes every pointer move/up to this manager, not only the ones
    /// hitting the dragged card.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged_card_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { card_id, .. } => Some(card_id),
            DragState::Idle => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn on_pointer_down(
        &mut self,
        card_id: &str,
        pointer: Point,
        button: PointerButton,
    ) -> PointerResponse {
        match button {
            PointerButton::Secondary => self
                .card(card_id)
                .map(|entry| PointerResponse::ShowDetails(entry.card.clone()))
                .unwrap_or(PointerResponse::Ignored),
            PointerButton::Primary => {
                if self.on_drag_start(card_id, pointer) {
                    PointerResponse::DragStarted
                } else {
                    PointerResponse::Ignored
                }
            }
        }
    }

    /// Starts dragging a card. Returns false when disabled, already dragging, or the card is
    /// not registered.
    pub fn on_drag_start(&mut self, card_id: &str, pointer: Point) -> bool {
        if !self.enabled {
            debug!(card_id, "drag ignored; interaction disabled");
            return false;
        }
        if self.is_dragging() {
            debug!(card_id, "drag ignored; another card is being dragged");
            return false;
        }
        let Some(entry) = self.card_mut(card_id) else {
            debug!(card_id, "drag ignored; card is not draggable");
            return false;
        };

        // Keep the grab point under the cursor instead of snapping the card's origin to it.
        let offset = entry.to_local(pointer) - entry.position;
        let restore = VisualRestore {
            alpha: entry.alpha,
            scale: entry.scale,
        };
        entry.alpha = LIFTED_ALPHA;
        entry.scale = restore.scale * LIFTED_SCALE_FACTOR;

        self.state = DragState::Dragging {
            card_id: card_id.to_string(),
            offset,
            restore,
        };
        true
    }

    pub fn on_drag_move(&mut self, pointer: Point) {
        let DragState::Dragging {
            card_id, offset, ..
        } = &self.state
        else {
            return;
        };
        let (card_id, offset) = (card_id.clone(), *offset);
        if let Some(entry) = self.card_mut(&card_id) {
            entry.position = entry.to_local(pointer) - offset;
        }
    }

    /// Resolves the drop under `pointer` and dispatches it.
    pub async fn on_drag_end<C>(
        &mut self,
        pointer: Point,
        actions: &mut C,
    ) -> Result<DropOutcome, BattleError>
    where
        C: CardActions,
    {
        let DragState::Dragging {
            card_id, restore, ..
        } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return Ok(DropOutcome::Cancelled);
        };
        let Some(card) = self.card(&card_id).map(|entry| entry.card.clone()) else {
            return Ok(DropOutcome::Cancelled);
        };

        let (result, applied) = match self.get_drop_target(pointer) {
            Some(DropTarget::Character {
                team,
                character_index,
            }) => (
                actions
                    .play_card_on_character(&card, team, character_index)
                    .await,
                DropOutcome::Played {
                    card_id: card_id.clone(),
                },
            ),
            Some(DropTarget::Discard) => (
                actions.discard_card(&card).await,
                DropOutcome::Discarded {
                    card_id: card_id.clone(),
                },
            ),
            None => {
                debug!(%card_id, "dropped outside any zone");
                self.restore_visuals(&card_id, restore);
                return Ok(DropOutcome::Cancelled);
            }
        };

        match result {
            Ok(ActionOutcome::Applied) => {
                self.remove_card(&card_id);
                Ok(applied)
            }
            Ok(outcome) => {
                debug!(%card_id, ?outcome, "drop not applied");
                self.restore_visuals(&card_id, restore);
                Ok(DropOutcome::Cancelled)
            }
            Err(err) => {
                self.restore_visuals(&card_id, restore);
                Err(err)
            }
        }
    }

    pub fn get_drop_target(&self, pointer: Point) -> Option<DropTarget> {
        self.zones
            .iter()
            .find(|zone| zone.area.contains(pointer))
            .map(|zone| zone.target)
    }

    /// Aborts an in-progress drag and restores the card's visuals.
    pub fn cancel_drag(&mut self) {
        if let DragState::Dragging {
            card_id, restore, ..
        } = std::mem::replace(&mut self.state, DragState::Idle)
        {
            debug!(%card_id, "drag cancelled");
            self.restore_visuals(&card_id, restore);
        }
    }

    /// Disabling also aborts any drag in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel_drag();
        }
    }

    fn restore_visuals(&mut self, card_id: &str, restore: VisualRestore) {
        if let Some(entry) = self.card_mut(card_id) {
            entry.alpha = restore.alpha;
            entry.scale = restore.scale;
        }
    }
}
