// Prompt templates for team names and winner congratulations.

use hrpro_core::labels::Locale;

/// A system/user prompt pair for one Messages API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Shared system prompt for every call.
pub fn system_prompt(locale: Locale) -> String {
    match locale {
        Locale::English => "You help an HR team run company events such as prize draws \
                            and team-building activities. Keep every answer short, upbeat, \
                            and suitable for a workplace audience."
            .to_string(),
        Locale::TraditionalChinese => "你協助人資團隊舉辦公司活動，例如抽獎與分組活動。\
                                       回答請簡短、正面，並適合職場場合。請使用繁體中文。"
            .to_string(),
    }
}

/// Ask for exactly `count` team names as a bare JSON array of strings.
pub fn team_names_prompt(locale: Locale, count: usize) -> Prompt {
    let user = match locale {
        Locale::English => format!(
            "Generate {count} creative, professional, and fun corporate team names. \
             Return only a JSON array of {count} strings, with no other text."
        ),
        Locale::TraditionalChinese => format!(
            "請產生 {count} 個有創意、專業又有趣的公司團隊名稱。\
             只回傳包含 {count} 個字串的 JSON 陣列，不要有其他文字。"
        ),
    };
    Prompt {
        system: system_prompt(locale),
        user,
    }
}

/// Ask for a one-line congratulation for the prize winner.
pub fn congratulation_prompt(locale: Locale, winner_name: &str) -> Prompt {
    let user = match locale {
        Locale::English => format!(
            "Write a short, enthusiastic, and humorous congratulation for the employee \
             \"{winner_name}\" who just won the grand prize. No more than 30 words. \
             Reply with the message only."
        ),
        Locale::TraditionalChinese => format!(
            "寫一段簡短、熱情且幽默的恭喜詞給抽中大獎的員工 \"{winner_name}\"。不超過30字。只回覆恭喜詞本身。"
        ),
    };
    Prompt {
        system: system_prompt(locale),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_names_prompt_states_count() {
        let prompt = team_names_prompt(Locale::English, 5);
        assert!(prompt.user.contains("Generate 5 "));
        assert!(prompt.user.contains("JSON array of 5 strings"));
        assert!(!prompt.system.is_empty());
    }

    #[test]
    fn congratulation_prompt_quotes_winner() {
        let prompt = congratulation_prompt(Locale::TraditionalChinese, "林怡君");
        assert!(prompt.user.contains("\"林怡君\""));
        assert!(prompt.system.contains("繁體中文"));
    }
}
