//! Toneless pinyin readings.
//!
//! Hanzi read as their default pinyin without tone marks, with `ü` written
//! as `v`. Anything else (latin letters, digits, model symbols such as
//! `sp`) reads as itself; consecutive non-Hanzi characters form a single
//! reading, so `"sp"` reads as `["sp"]` and `"a你"` as `["a", "ni"]`.

use pinyin::ToPinyin;

fn hanzi_reading(c: char) -> Option<String> {
    c.to_pinyin().map(|p| p.plain().replace('ü', "v"))
}

/// Reading of a single character.
pub fn char_reading(c: char) -> String {
    hanzi_reading(c).unwrap_or_else(|| c.to_string())
}

/// Reading sequence of a surface form.
pub fn readings(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut run = String::new();
    for c in text.chars() {
        match hanzi_reading(c) {
            Some(reading) => {
                if !run.is_empty() {
                    out.push(std::mem::take(&mut run));
                }
                out.push(reading);
            }
            None => run.push(c),
        }
    }
    if !run.is_empty() {
        out.push(run);
    }
    out
}

/// First reading of a unit; the unit itself when it has none (empty text).
pub fn unit_reading(unit: &str) -> String {
    match unit.chars().next() {
        Some(first) => match hanzi_reading(first) {
            Some(reading) => reading,
            None => readings(unit).into_iter().next().unwrap_or_default(),
        },
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hanzi_read_without_tone() {
        assert_eq!(char_reading('春'), "chun");
        assert_eq!(char_reading('走'), "zou");
        assert_eq!(char_reading('上'), "shang");
    }

    #[test]
    fn u_umlaut_written_as_v() {
        assert_eq!(char_reading('绿'), "lv");
        assert_eq!(char_reading('女'), "nv");
    }

    #[test]
    fn non_hanzi_reads_as_itself() {
        assert_eq!(char_reading('a'), "a");
        assert_eq!(char_reading('，'), "，");
    }

    #[test]
    fn readings_group_non_hanzi_runs() {
        assert_eq!(readings("sp"), ["sp"]);
        assert_eq!(readings("路上"), ["lu", "shang"]);
        assert_eq!(readings("ab你cd"), ["ab", "ni", "cd"]);
        assert!(readings("").is_empty());
    }

    #[test]
    fn unit_reading_takes_first_reading() {
        assert_eq!(unit_reading("在"), "zai");
        assert_eq!(unit_reading("世界"), "shi");
        assert_eq!(unit_reading("ok了"), "ok");
        assert_eq!(unit_reading(""), "");
    }
}
