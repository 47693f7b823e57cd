//! Pure string rules for cleaning media titles.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::fixer::Mode;

/// Matches release tags that get stripped from a title:
/// every `[...]` group, plus any `(...)` group that contains format information,
/// matched by resolution (e.g. 720p, 1920x1080) or bitrate (e.g. 8bit, 24bits).
/// Parenthesized groups without such a marker are part of the title and stay.
static RELEASE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[[^\]]+\]|\([^)]*(\dp|\dx\d|\dbit)[^)]*\)").expect("Failed to compile release tag regex")
});

/// youtube-dl appends a hyphen and an 11-character video id to the filename.
static YOUTUBE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\S{11}$").expect("Failed to compile youtube id regex"));

/// Imgur downloads end with " - " and a 7-character image id.
static IMGUR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" - \S{7}$").expect("Failed to compile imgur id regex"));

/// Clean the title of a media file (the file stem, not the whole filename and path).
///
/// Strips release tags, replaces underscores with spaces, and trims
/// surrounding whitespace. Idempotent.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    RELEASE_TAG.replace_all(title, "").replace('_', " ").trim().to_string()
}

/// Remove a trailing youtube-dl video id suffix from a file stem.
/// Returns the input unchanged if there is no such suffix,
/// including bare 11-character ids with no leading hyphen.
#[must_use]
pub fn strip_youtube_id(name: &str) -> String {
    YOUTUBE_ID.replace(name, "").into_owned()
}

/// Remove a trailing Imgur image id suffix from a file stem.
/// Returns the input unchanged if there is no such suffix.
#[must_use]
pub fn strip_imgur_id(name: &str) -> String {
    IMGUR_ID.replace(name, "").into_owned()
}

/// Get the full path with a cleaned filename for the given mode.
/// The extension is kept as-is.
pub fn fixed_file_path(path: &Path, mode: Mode) -> Result<PathBuf> {
    let (file_stem, extension) = crate::get_normalized_file_name_and_extension(path)?;
    let fixed = match mode {
        Mode::Torrent => normalize_title(&file_stem),
        Mode::Youtube => strip_youtube_id(&file_stem),
        Mode::Imgur => strip_imgur_id(&file_stem),
    };
    let new_name = if extension.is_empty() {
        fixed
    } else {
        format!("{fixed}.{extension}")
    };
    Ok(path.with_file_name(new_name))
}

/// Get the path with a cleaned name for the directory itself.
///
/// Only the final segment is cleaned; ancestor directories each get their own
/// pass when walking the tree, and the rename plans are applied deepest-first.
/// Returns `None` for paths without a name component (e.g. the filesystem root).
#[must_use]
pub fn fixed_directory_path(path: &Path) -> Option<PathBuf> {
    let name = crate::os_str_to_string(path.file_name()?).nfc().collect::<String>();
    Some(path.with_file_name(normalize_title(&name)))
}

#[cfg(test)]
mod title_tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        let titles = [
            (
                "[bonkai77] Ghost in the Shell Stand Alone Complex - 1x01 - Section 9  [1080p][x265]",
                "Ghost in the Shell Stand Alone Complex - 1x01 - Section 9",
            ),
            (
                "[bonkai77] Your Name (Kimi no Na wa)  [BD-1080p] [DUAL-AUDIO] [x265] [HEVC] [AAC] [10bit]",
                "Your Name (Kimi no Na wa)",
            ),
            ("[UTW]_Amagami_SS_-_01_[BD][h264-1080p_FLAC][82910A2B]", "Amagami SS - 01"),
            (
                "Black Lagoon - (SUB) - 6 - Moonlit Hunting Grounds",
                "Black Lagoon - (SUB) - 6 - Moonlit Hunting Grounds",
            ),
            (
                "[Coalgirls]_Code_Geass_Picture_Drama_(1920x1080_Blu-ray_FLAC)",
                "Code Geass Picture Drama",
            ),
            (
                "[CBM]_Cowboy_Bebop_-_Session_10_-_Ganymede_Elegy_[720p]_[D6DDA677]",
                "Cowboy Bebop - Session 10 - Ganymede Elegy",
            ),
            (
                "[Coalgirls]_Guilty_Crown_19_(1920x1080_Blu-ray_FLAC)_[7FDE4529]",
                "Guilty Crown 19",
            ),
            (
                "[Coalgirls]_Hyouka_NCOPED_(1920x1080_Blu-Ray_FLAC)_[65DA7CD1]",
                "Hyouka NCOPED",
            ),
            (
                "[Cleo]Kamisama_Hajimemashita_-_01_(Dual Audio_10bit_BD720p)",
                "Kamisama Hajimemashita - 01",
            ),
            (
                "[NoobSubs] Bakemonogatari NCED01 (1080p Blu-ray 8bit AAC)",
                "Bakemonogatari NCED01",
            ),
            (
                "[Erai-raws] Owarimonogatari S2 - 01~02 (Mayoi Hell) [1080p][A92C27DC]",
                "Owarimonogatari S2 - 01~02 (Mayoi Hell)",
            ),
        ];
        for (before, after) in titles {
            assert_eq!(normalize_title(before), after);
        }
    }

    #[test]
    fn test_normalize_title_is_idempotent() {
        let titles = [
            "[UTW]_Amagami_SS_-_01_[BD][h264-1080p_FLAC][82910A2B]",
            "Your Name (Kimi no Na wa)",
            "Black Lagoon - (SUB) - 6 - Moonlit Hunting Grounds",
            "",
            "   spaced   out   ",
        ];
        for title in titles {
            let once = normalize_title(title);
            assert_eq!(normalize_title(&once), once);
        }
    }

    #[test]
    fn test_normalize_title_keeps_plain_parentheses() {
        assert_eq!(normalize_title("Your Name (Kimi no Na wa)"), "Your Name (Kimi no Na wa)");
        assert_eq!(normalize_title("X (1920x1080 Blu-ray FLAC)"), "X");
        assert_eq!(normalize_title("Show (8bit)"), "Show");
        assert_eq!(normalize_title("Show (720p)"), "Show");
    }

    #[test]
    fn test_strip_youtube_id() {
        let files = [
            (
                "Dark Souls 3 - Sunlight Cleric [v5] _ Silver Knight - PVP Guide #113-qXoVFUb8GaA",
                "Dark Souls 3 - Sunlight Cleric [v5] _ Silver Knight - PVP Guide #113",
            ),
            (
                "Mission 5 - Capital Defense - Ace Combat Joint Assault - HD Walkthrough-oOPUeE8t3Hc",
                "Mission 5 - Capital Defense - Ace Combat Joint Assault - HD Walkthrough",
            ),
            ("dm8m3yz2tof01", "dm8m3yz2tof01"),
            (
                "AXSHN - Location (N2N & Vasta Remix)-BVBdqkHNl54",
                "AXSHN - Location (N2N & Vasta Remix)",
            ),
            ("xauzwl9ryp4", "xauzwl9ryp4"),
            ("chicken-with-bones-863810", "chicken-with-bones-863810"),
            (
                "The  Legend of Zelda - Breath of the Wild by atz in 3_57_00 AGDQ 2018-tsUvZ9yiN_U",
                "The  Legend of Zelda - Breath of the Wild by atz in 3_57_00 AGDQ 2018",
            ),
            (
                "Dark Souls 3 Encounter with a friendly chap-1VA5OP-I_Ls",
                "Dark Souls 3 Encounter with a friendly chap",
            ),
        ];
        for (before, after) in files {
            assert_eq!(strip_youtube_id(before), after);
        }
    }

    #[test]
    fn test_strip_youtube_id_is_idempotent() {
        let stripped = strip_youtube_id("AXSHN - Location (N2N & Vasta Remix)-BVBdqkHNl54");
        assert_eq!(strip_youtube_id(&stripped), stripped);
    }

    #[test]
    fn test_strip_imgur_id() {
        assert_eq!(strip_imgur_id("holiday album - aB3xY9z"), "holiday album");
        assert_eq!(strip_imgur_id("no suffix here"), "no suffix here");
        // Suffix must be exactly 7 non-whitespace characters
        assert_eq!(strip_imgur_id("short - abc"), "short - abc");
        assert_eq!(strip_imgur_id("long - abcdefgh"), "long - abcdefgh");
    }

    #[test]
    fn test_fixed_file_path_torrent() {
        let path = Path::new("Show/[Group] Show - 01 [1080p].mkv");
        let fixed = fixed_file_path(path, Mode::Torrent).unwrap();
        assert_eq!(fixed, Path::new("Show/Show - 01.mkv"));
    }

    #[test]
    fn test_fixed_file_path_keeps_extension_untouched() {
        let path = Path::new("videos/Gameplay clip-1VA5OP-I_Ls.MP4");
        let fixed = fixed_file_path(path, Mode::Youtube).unwrap();
        assert_eq!(fixed, Path::new("videos/Gameplay clip.MP4"));
    }

    #[test]
    fn test_fixed_file_path_without_extension() {
        let path = Path::new("pics/holiday album - aB3xY9z");
        let fixed = fixed_file_path(path, Mode::Imgur).unwrap();
        assert_eq!(fixed, Path::new("pics/holiday album"));
    }

    #[test]
    fn test_fixed_directory_path() {
        let path = Path::new("/media/downloads/[Group] Show [1080p]");
        assert_eq!(fixed_directory_path(path), Some(PathBuf::from("/media/downloads/Show")));

        let nested = Path::new("/media/[Group] Show [1080p]/Season_1");
        assert_eq!(
            fixed_directory_path(nested),
            Some(PathBuf::from("/media/[Group] Show [1080p]/Season 1"))
        );
    }

    #[test]
    fn test_fixed_directory_path_clean_name_unchanged() {
        let path = Path::new("/media/Show/Season 1");
        assert_eq!(fixed_directory_path(path), Some(path.to_path_buf()));
    }

    #[test]
    fn test_fixed_directory_path_without_name_component() {
        assert_eq!(fixed_directory_path(Path::new("/")), None);
    }
}
