use std::collections::VecDeque;

use crate::Coords;
use crate::field::Field;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit vector as `(x, y)`: `x` moves the column, `y` moves the row.
    pub fn vector(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn offset(self, pos: Coords) -> Coords {
        let (x, y) = self.vector();
        (pos.0 + y, pos.1 + x)
    }

    /// The direction to take when `requested` comes in while heading `self`.
    /// Reversing straight into the body is not allowed.
    pub fn turn(self, requested: Direction) -> Direction {
        if requested == self.opposite() { self } else { requested }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the head landed on food and the snake grew.
    Moved { new_head: Coords, old_tail: Option<Coords> },
    Crashed(Crash)
}

impl MoveResult {
    pub fn ate(&self) -> bool {
        matches!(self, Moved { old_tail: None, .. })
    }
}

/// Body segments, head first.
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
}

impl Snake {
    pub fn new(head: Coords, size: u16, direction: Direction) -> Self {
        let back = direction.opposite();
        let mut body = VecDeque::with_capacity(size.max(1) as usize);
        let mut pos = head;

        for _ in 0..size.max(1) {
            body.push_back(pos);
            pos = back.offset(pos);
        }

        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_body(body: Vec<Coords>, direction: Direction) -> Self {
        assert!(!body.is_empty());
        Snake { body: body.into(), direction }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Steps one cell in the current direction. Landing on `food` keeps the
    /// tail, anything else drops it.
    pub fn move_step(&mut self, field: &Field, food: Coords) -> MoveResult {
        let new_head = self.direction.offset(self.head());

        if !field.contains(new_head) {
            return Crashed(Crash::Wall);
        }

        let eats = new_head == food;

        // The tail moves out of the way this step unless the snake grows
        let solid = if eats { self.body.len() } else { self.body.len() - 1 };
        if self.body.iter().take(solid).any(|pos| *pos == new_head) {
            return Crashed(Crash::Body);
        }

        self.body.push_front(new_head);

        if eats {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        self.direction = self.direction.turn(new_direction);
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
