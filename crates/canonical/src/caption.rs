use once_cell::sync::Lazy;
use regex::Regex;

/// Line prefixes that mark a photo caption or credit rather than body text.
static CAPTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:this image|this photo|photo by|image by|image released by|image via|photo via|\(photo by|\(image by|\(ap photo|\(.*?via ap\)|\(.*?photo.*?\)|director.*?pose for photographers)",
    )
    .expect("valid caption pattern")
});

static EXTRA_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank-line pattern"));

/// Lines shorter than this are candidates for the all-caps caption rule.
const SHORT_LINE_CHARS: usize = 20;

/// Strip image captions and photo credits from article text.
///
/// Every line is trimmed. A line is dropped when it starts like a caption
/// (`"Photo by ..."`, `"(AP Photo/...)"`, `"This image released by ..."`) or
/// when it is a short all-caps label without closing punctuation. Runs of
/// more than one blank line are squeezed to one and the result is trimmed.
///
/// ```rust
/// use canonical::remove_image_descriptions;
///
/// let text = "Markets rallied on Friday.\n(AP Photo/Seth Wenig)\nStocks closed higher.";
/// assert_eq!(
///     remove_image_descriptions(text),
///     "Markets rallied on Friday.\nStocks closed higher."
/// );
/// ```
pub fn remove_image_descriptions(text: &str) -> String {
    let kept: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| line.is_empty() || !is_caption(line))
        .collect();

    EXTRA_BLANK_LINES
        .replace_all(&kept.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn is_caption(line: &str) -> bool {
    CAPTION_LINE.is_match(line) || is_short_label(line)
}

fn is_short_label(line: &str) -> bool {
    line.chars().count() < SHORT_LINE_CHARS
        && !line.ends_with(['.', '!', '?'])
        && line.chars().any(char::is_uppercase)
        && !line.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_caption_and_credit_lines() {
        let text = "\
This image released by Netflix shows a scene from the film.
The series returns next month.
Photo by Jane Doe/Getty Images
(Handout via AP)
(Reuters Photo/File)
Director Ava Smith and cast pose for photographers at the premiere.
Critics were impressed.";

        assert_eq!(
            remove_image_descriptions(text),
            "The series returns next month.\nCritics were impressed."
        );
    }

    #[test]
    fn prefixes_match_case_insensitively() {
        assert_eq!(remove_image_descriptions("PHOTO VIA the archive\nBody."), "Body.");
    }

    #[test]
    fn short_all_caps_labels_are_dropped() {
        let text = "WASHINGTON\nThe vote passed.\nNO!\nOK";
        assert_eq!(remove_image_descriptions(text), "The vote passed.\nNO!");
    }

    #[test]
    fn short_mixed_case_lines_survive() {
        assert_eq!(remove_image_descriptions("In brief\nMore soon"), "In brief\nMore soon");
    }

    #[test]
    fn blank_runs_are_squeezed_and_ends_trimmed() {
        let text = "\n\nFirst paragraph.\n\n\n\n   \nSecond paragraph.\n\n";
        assert_eq!(
            remove_image_descriptions(text),
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(remove_image_descriptions(""), "");
    }

    #[test]
    fn body_text_mentioning_photos_is_kept() {
        let text = "She said the photo by the river was her favourite.";
        assert_eq!(remove_image_descriptions(text), text);
    }
}
