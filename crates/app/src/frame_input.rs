//! Keyboard state to one `PlayerInput` per frame. The core never sees key
//! codes; this mapping is the whole translation layer.

use thornvale_core::PlayerInput;

#[derive(Clone, Copy, Debug, Default)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub interact: bool,
}

pub fn input_for_frame(keys: HeldKeys) -> PlayerInput {
    PlayerInput {
        dx: i32::from(keys.right) - i32::from(keys.left),
        dy: i32::from(keys.down) - i32::from(keys.up),
        attack: keys.attack,
        interact: keys.interact,
    }
}
