//! Uzbek Cyrillic to Latin script conversion.

use crate::sura::Transliterate;

/// Converts Uzbek Cyrillic text to the official Latin alphabet.
///
/// Characters outside the Uzbek Cyrillic alphabet pass through unchanged.
/// `е` becomes `ye` at the start of a word or after a vowel or sign letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct UzbekLatin;

impl Transliterate for UzbekLatin {
    fn transliterate(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());

        for (index, &ch) in chars.iter().enumerate() {
            let lower = ch.to_lowercase().next().unwrap_or(ch);
            let previous = index.checked_sub(1).map(|i| chars[i]);
            let Some(latin) = latin_for(lower, previous) else {
                out.push(ch);
                continue;
            };
            if ch == lower {
                out.push_str(latin);
                continue;
            }

            // Whole-word capitals spell digraphs fully upper: ШУКР -> SHUKR.
            let next = chars.get(index + 1).copied();
            let all_caps = next.is_some_and(char::is_uppercase)
                || (previous.is_some_and(char::is_uppercase)
                    && !next.is_some_and(char::is_alphabetic));
            if all_caps {
                out.push_str(&latin.to_uppercase());
            } else {
                let mut letters = latin.chars();
                if let Some(first) = letters.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(letters.as_str());
                }
            }
        }
        out
    }
}

fn latin_for(lower: char, previous: Option<char>) -> Option<&'static str> {
    Some(match lower {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' if starts_ye(previous) => "ye",
        'е' | 'э' => "e",
        'ё' => "yo",
        'ж' => "j",
        'з' => "z",
        'и' | 'ы' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "x",
        'ц' => "ts",
        'ч' => "ch",
        'ш' | 'щ' => "sh",
        'ъ' => "\u{2bc}",
        'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        'ў' => "o\u{2bb}",
        'қ' => "q",
        'ғ' => "g\u{2bb}",
        'ҳ' => "h",
        _ => return None,
    })
}

fn starts_ye(previous: Option<char>) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            let prev = prev.to_lowercase().next().unwrap_or(prev);
            !prev.is_alphabetic() || "аеёиоуўэюяъь".contains(prev)
        }
    }
}
