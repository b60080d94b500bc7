use super::model::Dungeon;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Check the structural invariants of a dungeon: a single start room,
/// in-bounds rooms, edges that target existing rooms and mirror back, and
/// full reachability from the start. Returns every problem found.
pub fn validate_dungeon(dungeon: &Dungeon) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    // Rooms must not be empty
    if dungeon.is_empty() {
        errors.push(ValidationError::new("dungeon has no rooms"));
        return errors;
    }

    if dungeon.len() > dungeon.capacity() {
        errors.push(ValidationError::new(format!(
            "{} rooms exceed the {}x{} grid",
            dungeon.len(),
            dungeon.width(),
            dungeon.height()
        )));
    }

    // Exactly one start, and it is the one the dungeon points at
    let flagged: Vec<_> = dungeon.rooms().filter(|r| r.is_start).collect();
    match (dungeon.start(), flagged.as_slice()) {
        (None, _) => errors.push(ValidationError::new("dungeon has no start room")),
        (Some(start), [only]) if only.position == start => {}
        (Some(start), []) => errors.push(ValidationError::new(format!(
            "start {} is not flagged as a start room",
            start
        ))),
        (Some(start), many) => {
            let listed = many
                .iter()
                .map(|r| r.position.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(ValidationError::new(format!(
                "start is {} but rooms flagged as start are: {}",
                start, listed
            )));
        }
    }

    for room in dungeon.rooms() {
        if !dungeon.in_bounds(room.position) {
            errors.push(ValidationError::new(format!(
                "room {} at {} lies outside the map",
                room.id, room.position
            )));
        }

        // Validate edges
        for (direction, target) in room.connections() {
            let Some(peer) = dungeon.room(*target) else {
                errors.push(ValidationError::new(format!(
                    "room {} edge {} targets missing room {}",
                    room.id, direction, target
                )));
                continue;
            };
            if peer.connection(direction.opposite()) != Some(room.position) {
                errors.push(ValidationError::new(format!(
                    "room {} edge {} to {} is not mirrored",
                    room.id, direction, target
                )));
            }
        }
    }

    if dungeon.start().is_some() && !dungeon.is_fully_reachable() {
        errors.push(ValidationError::new(
            "some rooms are unreachable from the start room",
        ));
    }

    errors
}
