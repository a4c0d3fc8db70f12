use game_types::GameError;

pub const MAX_NICKNAME_LEN: usize = 24;
pub const MAX_WORD_LEN: usize = 32;
pub const MAX_CHAT_LEN: usize = 280;

/// Trims a requested nickname and rejects ones that cannot form a display name.
pub fn validate_nickname(raw: &str) -> Result<String, GameError> {
    let nickname = raw.trim();

    if nickname.is_empty() {
        return Err(GameError::InvalidNickname {
            reason: "name cannot be empty".to_string(),
        });
    }
    if nickname.chars().count() > MAX_NICKNAME_LEN {
        return Err(GameError::InvalidNickname {
            reason: format!("name must be at most {} characters", MAX_NICKNAME_LEN),
        });
    }
    // '#' separates the nickname from the connection suffix
    if nickname.contains('#') {
        return Err(GameError::InvalidNickname {
            reason: "name cannot contain '#'".to_string(),
        });
    }

    Ok(nickname.to_string())
}

/// The drawer's word keeps its casing for redisplay.
pub fn validate_secret_word(raw: &str) -> Result<String, GameError> {
    let word = raw.trim();

    if word.is_empty() {
        return Err(GameError::EmptyInput {
            field: "Word".to_string(),
        });
    }
    if word.chars().count() > MAX_WORD_LEN {
        return Err(GameError::TooLong {
            field: "Word".to_string(),
            max: MAX_WORD_LEN,
        });
    }

    Ok(word.to_string())
}

pub fn validate_guess(raw: &str) -> Result<String, GameError> {
    let guess = raw.trim();
    if guess.is_empty() {
        return Err(GameError::EmptyInput {
            field: "Guess".to_string(),
        });
    }
    Ok(guess.to_string())
}

pub fn guess_matches(guess: &str, word: &str) -> bool {
    guess.trim().to_lowercase() == word.trim().to_lowercase()
}

/// Empty messages are dropped; long ones are cut at `MAX_CHAT_LEN` characters.
pub fn sanitize_chat_message(raw: &str) -> Option<String> {
    let message = raw.trim();
    if message.is_empty() {
        return None;
    }
    Some(message.chars().take(MAX_CHAT_LEN).collect())
}
