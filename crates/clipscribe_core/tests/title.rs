use clipscribe_core::{
    bounded_filename, derive_filename, extract_title, fallback_stem, sanitize_filename,
    suffixed_filename, MAX_FILENAME_CHARS, TRUNCATED_STEM_CHARS,
};
use pretty_assertions::assert_eq;

#[test]
fn level_one_heading_is_the_title() {
    let text = "# 红烧肉\n\n## 食材\n- 五花肉\n";
    assert_eq!(extract_title(Some(text)).as_deref(), Some("红烧肉"));
}

#[test]
fn heading_further_down_still_wins_over_first_line() {
    let text = "Intro line\n\n#   Braised Pork  \nbody";
    assert_eq!(extract_title(Some(text)).as_deref(), Some("Braised Pork"));
}

#[test]
fn first_line_markup_is_stripped_without_heading() {
    assert_eq!(
        extract_title(Some("- some note\nmore")).as_deref(),
        Some("some note")
    );
    assert_eq!(
        extract_title(Some("\n\n**> Bold quote**\n")).as_deref(),
        Some("Bold quote**")
    );
}

#[test]
fn code_fences_are_skipped_when_scanning_lines() {
    let text = "```markdown\n\nDumplings\n```";
    assert_eq!(extract_title(Some(text)).as_deref(), Some("Dumplings"));
}

#[test]
fn absent_or_blank_text_has_no_title() {
    assert_eq!(extract_title(None), None);
    assert_eq!(extract_title(Some("")), None);
    assert_eq!(extract_title(Some("  \n```\n---\n")), None);
}

#[test]
fn illegal_characters_become_underscores() {
    assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
    assert_eq!(sanitize_filename(" <x>|\"y\"?* "), "_x___y___");
    assert_eq!(sanitize_filename("back\\slash"), "back_slash");
}

#[test]
fn long_names_are_cut_to_stem_bound_plus_extension() {
    let stem = "abcdefghijklmnopqrstuvwxyz0";
    let name = format!("{stem}.md");
    assert_eq!(name.chars().count(), 30);

    let bounded = bounded_filename(stem);
    assert_eq!(bounded, "abcdefghijklmnopqrst.md");
    assert_eq!(
        bounded.trim_end_matches(".md").chars().count(),
        TRUNCATED_STEM_CHARS
    );
}

#[test]
fn short_names_are_left_alone() {
    assert_eq!(bounded_filename("Soup"), "Soup.md");
    // 22 + 3 = 25 characters is still within bounds.
    assert_eq!(
        bounded_filename("abcdefghijklmnopqrstuv"),
        "abcdefghijklmnopqrstuv.md"
    );
}

#[test]
fn length_is_counted_in_characters_not_bytes() {
    let stem = "葱油拌面葱油拌面葱油拌面葱油拌面葱油拌面葱油拌面";
    let bounded = bounded_filename(stem);
    assert_eq!(bounded.chars().count(), TRUNCATED_STEM_CHARS + 3);
}

#[test]
fn cut_ending_on_a_space_does_not_leave_it_before_the_extension() {
    assert_eq!(
        derive_filename(Some("# Red braised pork in soy sauce"), "u"),
        "Red braised pork in.md"
    );
}

#[test]
fn suffixed_names_stay_within_the_bound() {
    let stem = "Slow braised pork be";
    let name = suffixed_filename(stem, "6ca202c8");
    assert_eq!(name, "Slow braised-6ca202c8.md");
    assert!(name.chars().count() <= MAX_FILENAME_CHARS);

    assert_eq!(suffixed_filename("Soup", "6ca202c8"), "Soup-6ca202c8.md");
    let wide = suffixed_filename("葱油拌面葱油拌面葱油拌面葱油拌面", "0011aabb");
    assert_eq!(wide.chars().count(), MAX_FILENAME_CHARS);
}

#[test]
fn fallback_uses_video_query_parameter() {
    assert_eq!(
        fallback_stem("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
        "Video_dQw4w9WgXcQ"
    );
    assert_eq!(fallback_stem("https://youtu.be/abc"), "Video_unknown");
    assert_eq!(fallback_stem("not a url ?v=xyz"), "Video_xyz");
    assert_eq!(fallback_stem("not a url"), "Video_unknown");
}

#[test]
fn derive_composes_title_sanitizing_and_bounds() {
    assert_eq!(derive_filename(Some("# Soup\nbody"), "u2"), "Soup.md");
    assert_eq!(derive_filename(Some("# a/b:c"), "u"), "a_b_c.md");
    assert_eq!(
        derive_filename(None, "https://www.youtube.com/watch?v=abc123"),
        "Video_abc123.md"
    );
    assert_eq!(derive_filename(Some("\n\n"), "u"), "Video_unknown.md");
}
