//! Session tokens kept in localStorage between page loads

use web_sys::{window, Storage};

#[derive(Clone, Copy, Debug)]
enum TokenSlot {
    Access,
    Refresh,
}

impl TokenSlot {
    const ALL: [TokenSlot; 2] = [TokenSlot::Access, TokenSlot::Refresh];

    fn key(self) -> &'static str {
        match self {
            TokenSlot::Access => "training_console_access_token",
            TokenSlot::Refresh => "training_console_refresh_token",
        }
    }
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

fn write(slot: TokenSlot, token: &str) {
    let Some(storage) = local_storage() else {
        log::warn!("localStorage unavailable, {:?} token not persisted", slot);
        return;
    };
    if let Err(e) = storage.set_item(slot.key(), token) {
        log::warn!("Failed to persist {:?} token: {:?}", slot, e);
    }
}

fn read(slot: TokenSlot) -> Option<String> {
    local_storage()?
        .get_item(slot.key())
        .ok()?
        .filter(|token| !token.is_empty())
}

pub fn save_access_token(token: &str) {
    write(TokenSlot::Access, token);
}

pub fn get_access_token() -> Option<String> {
    read(TokenSlot::Access)
}

pub fn save_refresh_token(token: &str) {
    write(TokenSlot::Refresh, token);
}

pub fn get_refresh_token() -> Option<String> {
    read(TokenSlot::Refresh)
}

/// Forget both tokens (logout or a rejected refresh)
pub fn clear_tokens() {
    if let Some(storage) = local_storage() {
        for slot in TokenSlot::ALL {
            let _ = storage.remove_item(slot.key());
        }
    }
}
