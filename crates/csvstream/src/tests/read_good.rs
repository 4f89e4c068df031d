use rstest::rstest;

use super::{render, semicolons, whitespace_separated};
use crate::Specification;

#[rstest]
#[case::empty("", "eof@0:0")]
#[case::only_whitespace("  ", "eof@0:2")]
#[case::only_empty_lines("\r\n\n\n   \n ", "eof@4:1")]
#[case::one_empty_quoted_cell("\"\"", r#"[""@0:0] eof@0:2"#)]
#[case::bare_separator(",", r#"[""@0:0 ""@0:1] eof@0:1"#)]
#[case::two_separators(",,", r#"[""@0:0 ""@0:1 ""@0:2] eof@0:2"#)]
#[case::empty_cells_with_whitespace(" , ,   ", r#"[""@0:0 ""@0:2 ""@0:4] eof@0:7"#)]
#[case::empty_cells_on_two_lines(",,\n,", r#"[""@0:0 ""@0:1 ""@0:2] [""@1:0 ""@1:1] eof@1:1"#)]
#[case::empty_cells_on_two_lines_with_whitespace(
    " , ,   \n  ,",
    r#"[""@0:0 ""@0:2 ""@0:4] [""@1:0 ""@1:3] eof@1:3"#
)]
#[case::quoted_then_unquoted_empty("\"\",,", r#"[""@0:0 ""@0:3 ""@0:4] eof@0:4"#)]
#[case::padded_quoted_then_unquoted_empty(" \"\" , ,   ", r#"[""@0:1 ""@0:5 ""@0:7] eof@0:10"#)]
#[case::quoted_empty_in_the_middle(", \"\" , ", r#"[""@0:0 ""@0:2 ""@0:6] eof@0:7"#)]
#[case::quoted_empty_at_the_end(",,\"\"", r#"[""@0:0 ""@0:1 ""@0:2] eof@0:4"#)]
#[case::padded_quoted_empty_at_the_end(", , \"\" ", r#"[""@0:0 ""@0:1 ""@0:4] eof@0:7"#)]
#[case::one_cell("abc", r#"["abc"@0:0] eof@0:3"#)]
#[case::one_padded_cell("  \tabc\t ", r#"["abc"@0:3] eof@0:8"#)]
#[case::one_quoted_cell("\" \tabc \"", r#"[" \tabc "@0:0] eof@0:8"#)]
#[case::one_padded_quoted_cell("  \" \tabc \"  ", r#"[" \tabc "@0:2] eof@0:12"#)]
#[case::one_row("abc,def,ghi", r#"["abc"@0:0 "def"@0:4 "ghi"@0:8] eof@0:11"#)]
#[case::one_row_after_blank_line(
    " \n abc , def,ghi  \n\n",
    r#"["abc"@1:1 "def"@1:7 "ghi"@1:11] eof@3:0"#
)]
#[case::one_mixed_row(
    " \n abc ,\" def\",ghi,,\"\"",
    r#"["abc"@1:1 " def"@1:6 "ghi"@1:13 ""@1:17 ""@1:18] eof@1:20"#
)]
#[case::first_column_empty(",a,b,c", r#"[""@0:0 "a"@0:1 "b"@0:3 "c"@0:5] eof@0:6"#)]
#[case::first_column_empty_padded(
    "  , a  ,  b  , c  ",
    r#"[""@0:0 "a"@0:4 "b"@0:10 "c"@0:15] eof@0:18"#
)]
#[case::first_column_empty_crlf(
    "\n,a,b,c\r\n",
    r#"[""@1:0 "a"@1:1 "b"@1:3 "c"@1:5] eof@2:0"#
)]
#[case::first_column_quoted_empty("\"\",a,b,c", r#"[""@0:0 "a"@0:3 "b"@0:5 "c"@0:7] eof@0:8"#)]
#[case::first_column_quoted_empty_padded(
    " \"\" , a , b , c  \n",
    r#"[""@0:1 "a"@0:6 "b"@0:10 "c"@0:14] eof@1:0"#
)]
#[case::second_column_empty("a,,b,c", r#"["a"@0:0 ""@0:2 "b"@0:3 "c"@0:5] eof@0:6"#)]
#[case::second_column_empty_padded(
    "  \"a\" ,  ,  b , c  ",
    r#"["a"@0:2 ""@0:7 "b"@0:12 "c"@0:16] eof@0:19"#
)]
#[case::second_column_quoted_empty("a,\"\",b,c", r#"["a"@0:0 ""@0:2 "b"@0:5 "c"@0:7] eof@0:8"#)]
#[case::second_column_quoted_empty_padded(
    " a , \"\" , b , c ",
    r#"["a"@0:1 ""@0:5 "b"@0:10 "c"@0:14] eof@0:16"#
)]
#[case::last_column_empty("a,b,c,", r#"["a"@0:0 "b"@0:2 "c"@0:4 ""@0:6] eof@0:6"#)]
#[case::last_column_empty_newline("a,b,c,\n", r#"["a"@0:0 "b"@0:2 "c"@0:4 ""@0:6] eof@1:0"#)]
#[case::last_column_empty_padded(
    "\ta , b \t, c  ,  ",
    r#"["a"@0:1 "b"@0:5 "c"@0:10 ""@0:14] eof@0:16"#
)]
#[case::last_column_empty_padded_newline(
    "\ta , b \t, c  ,  \n  ",
    r#"["a"@0:1 "b"@0:5 "c"@0:10 ""@0:14] eof@1:2"#
)]
#[case::last_column_quoted_empty("a,b,c,\"\"", r#"["a"@0:0 "b"@0:2 "c"@0:4 ""@0:6] eof@0:8"#)]
#[case::last_column_quoted_empty_crlf(
    "a,b,c,\"\"\r\n",
    r#"["a"@0:0 "b"@0:2 "c"@0:4 ""@0:6] eof@1:0"#
)]
#[case::last_column_quoted_empty_padded(
    " a , b , c  , \"\"",
    r#"["a"@0:1 "b"@0:5 "c"@0:9 ""@0:14] eof@0:16"#
)]
#[case::last_column_quoted_empty_padded_newline(
    " a , b , c  , \"\"  \n",
    r#"["a"@0:1 "b"@0:5 "c"@0:9 ""@0:14] eof@1:0"#
)]
#[case::doubled_quotes("\"a \"\"\"\" bc\"", r#"["a \"\" bc"@0:0] eof@0:11"#)]
#[case::trailing_doubled_quote("\"abc\"\"\"", r#"["abc\""@0:0] eof@0:7"#)]
#[case::quote_inside_unquoted(" \n abc\"  \n\n ", r#"["abc\""@1:1] eof@3:1"#)]
#[case::newlines_inside_quotes(" \" a\nbc \t\n \" \n\n ", r#"[" a\nbc \t\n "@0:1] eof@4:1"#)]
#[case::one_column(
    " a1\r\n \n  b1  b2  \r\n\"a3\"\n\r\n",
    r#"["a1"@0:1] ["b1  b2"@2:2] ["a3"@3:0] eof@5:0"#
)]
#[case::escaping("\"a \"\"b\"\" c\"", r#"["a \"b\" c"@0:0] eof@0:11"#)]
#[case::lone_carriage_return("a\rb", r#"["a"@0:0] ["b"@1:0] eof@1:1"#)]
#[case::non_ascii("ä,\"ö\"", r#"["ä"@0:0 "ö"@0:2] eof@0:5"#)]
fn default_dialect(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(render(text, Specification::new()), expected);
}

#[rstest]
#[case::matrix(
    " a1; a2; a3 \r\nb1  ; \"b\n2\"\n;;;\n\n c1 ;  c2.1,c2.2",
    semicolons(),
    concat!(
        r#"["a1"@0:1 "a2"@0:5 "a3"@0:9] "#,
        r#"["b1"@1:0 "b\n2"@1:6] "#,
        r#"[""@3:0 ""@3:1 ""@3:2 ""@3:3] "#,
        r#"["c1"@5:1 "c2.1,c2.2"@5:7] eof@5:16"#,
    )
)]
#[case::significant_blank_lines(
    " a1; a2; a3 \r\n\nb1  ; \"b2\"  \n\n c1 ;  c2.1,c2.2\r\n",
    semicolons().with_blank_lines_significant(),
    concat!(
        r#"["a1"@0:1 "a2"@0:5 "a3"@0:9] [] "#,
        r#"["b1"@2:0 "b2"@2:6] [] "#,
        r#"["c1"@4:1 "c2.1,c2.2"@4:7] eof@5:0"#,
    )
)]
#[case::significant_blank_lines_single_column(
    "\"a\"\r\n\n\nb \n\r\n",
    semicolons().with_blank_lines_significant(),
    r#"["a"@0:0] [] [] ["b"@3:0] [] eof@5:0"#
)]
#[case::significant_blank_lines_with_empty_cells(
    "\"a\",\r\n\n,,\n,,\"\"\nb, \n\r\n",
    Specification::new().with_blank_lines_significant(),
    concat!(
        r#"["a"@0:0 ""@0:4] [] "#,
        r#"[""@2:0 ""@2:1 ""@2:2] "#,
        r#"[""@3:0 ""@3:1 ""@3:2] "#,
        r#"["b"@4:0 ""@4:2] [] eof@6:0"#,
    )
)]
#[case::multiple_separators(
    " \n abc ,; def;ghi,1  \n\n",
    Specification::new().with_separator(',').with_separator(';'),
    r#"["abc"@1:1 ""@1:6 "def"@1:8 "ghi"@1:12 "1"@1:16] eof@3:0"#
)]
#[case::single_quotes(
    "'a,b',c ,'it''s'",
    Specification::new().with_quote('\''),
    r#"["a,b"@0:0 "c"@0:6 "it's"@0:9] eof@0:16"#
)]
#[case::decimal_comma_needs_other_separator(
    "1,5;2,25",
    semicolons().with_decimal_separator(','),
    r#"["1,5"@0:0 "2,25"@0:4] eof@0:8"#
)]
fn other_dialects(#[case] text: &str, #[case] spec: Specification, #[case] expected: &str) {
    assert_eq!(render(text, spec), expected);
}

#[rstest]
#[case::single("  a  ", r#"["a"@0:2] eof@0:5"#)]
#[case::single_quoted("  \"a\"  ", r#"["a"@0:2] eof@0:7"#)]
#[case::pair("a b", r#"["a"@0:0 "b"@0:2] eof@0:3"#)]
#[case::quoted_pair("\"a\" \"b\"", r#"["a"@0:0 "b"@0:4] eof@0:7"#)]
#[case::padded_pair("  a   b  ", r#"["a"@0:2 "b"@0:6] eof@0:9"#)]
#[case::quoted_with_space("  \"a b \"  ", r#"["a b "@0:2] eof@0:10"#)]
#[case::space_then_tab("\"a\" \tb", r#"["a"@0:0 "b"@0:5] eof@0:6"#)]
#[case::mixed(
    "\"1\" 2 3\n  \"1\"   2   3 \n1 \"2\" 3\r\n1  \"2\"  3 \r\n1 2 \"3\"\r\n1 2 \"3\"    \n",
    concat!(
        r#"["1"@0:0 "2"@0:4 "3"@0:6] "#,
        r#"["1"@1:2 "2"@1:8 "3"@1:12] "#,
        r#"["1"@2:0 "2"@2:2 "3"@2:6] "#,
        r#"["1"@3:0 "2"@3:3 "3"@3:8] "#,
        r#"["1"@4:0 "2"@4:2 "3"@4:4] "#,
        r#"["1"@5:0 "2"@5:2 "3"@5:4] eof@6:0"#,
    )
)]
fn whitespace_separators(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(render(text, whitespace_separated()), expected);
}

#[test]
fn whitespace_separators_with_significant_blank_lines() {
    let text = concat!(
        "\"1\" 2 3\n  \t  \n",
        "  \"1\"   2   3 \n",
        "1 \"2\" 3\r\n",
        "1  \"2\"  3 \r\n",
        "1 2 \"3\"\r\n",
        "1 2 \"3\"    \n\r\n",
    );
    let expected = concat!(
        r#"["1"@0:0 "2"@0:4 "3"@0:6] [] "#,
        r#"["1"@2:2 "2"@2:8 "3"@2:12] "#,
        r#"["1"@3:0 "2"@3:2 "3"@3:6] "#,
        r#"["1"@4:0 "2"@4:3 "3"@4:8] "#,
        r#"["1"@5:0 "2"@5:2 "3"@5:4] "#,
        r#"["1"@6:0 "2"@6:2 "3"@6:4] [] eof@8:0"#,
    );
    assert_eq!(
        render(text, whitespace_separated().with_blank_lines_significant()),
        expected
    );
}

#[rstest]
#[case::comment_only("   #", "eof@0:4")]
#[case::quoted_comment_char(" \"#\"", r##"["#"@0:1] eof@0:4"##)]
#[case::comment_line_then_row("   #\na", r#"["a"@1:0] eof@1:1"#)]
#[case::after_unquoted("  a#,b,c,d\n1,2,3", r#"["a"@0:2] ["1"@1:0 "2"@1:2 "3"@1:4] eof@1:5"#)]
#[case::after_unquoted_space("  a #,b,c,d\n1,2,3", r#"["a"@0:2] ["1"@1:0 "2"@1:2 "3"@1:4] eof@1:5"#)]
#[case::after_quoted("  \"a\"#,b,c,d\n1,2,3", r#"["a"@0:2] ["1"@1:0 "2"@1:2 "3"@1:4] eof@1:5"#)]
#[case::after_quoted_space(
    "  \"a\" #,b,c,d\n1,2,3",
    r#"["a"@0:2] ["1"@1:0 "2"@1:2 "3"@1:4] eof@1:5"#
)]
#[case::after_separator(
    "  \"a\" , #,b,c,d\n1,2,3",
    r#"["a"@0:2 ""@0:7] ["1"@1:0 "2"@1:2 "3"@1:4] eof@1:5"#
)]
#[case::at_end_of_input("a,b#c", r#"["a"@0:0 "b"@0:2] eof@0:5"#)]
fn comments(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(render(text, Specification::new().with_comment('#')), expected);
}

#[test]
fn comment_with_whitespace_separators() {
    assert_eq!(
        render(
            "  \"a\" # b c d\n1 2 3",
            whitespace_separated().with_comment('#')
        ),
        r#"["a"@0:2] ["1"@1:0 "2"@1:2 "3"@1:4] eof@1:5"#
    );
}

#[test]
fn comment_lines_never_produce_rows() {
    assert_eq!(
        render(
            "#x\n\n a\n  # y\n",
            Specification::new()
                .with_comment('#')
                .with_blank_lines_significant()
        ),
        r#"[] ["a"@2:1] eof@4:0"#
    );
}
