mod cases;

use indoc::indoc;

test_case!(
    cut_commits_to_first_choice,
    input: "let x = amb(1, 2, 3); cut; x;",
    solutions: ["1"],
);

test_case!(
    cut_keeps_every_value_of_later_statements,
    input: "let x = amb(1, 2); cut; x + amb(10, 20);",
    solutions: ["11", "21"],
);

test_case!(
    cut_before_any_choice_is_harmless,
    input: "cut; amb(1, 2, 3);",
    solutions: ["1", "2", "3"],
);

test_case!(
    cut_inside_block_prunes_only_the_block,
    input: indoc! {"
        let x = amb('a', 'b');
        {
            let y = amb(1, 2);
            cut;
            display(x, y);
        }
    "},
    solutions: ["a 1", "b 1"],
);

test_case!(
    trailing_cut_in_block_reaches_enclosing_statements,
    input: indoc! {"
        let x = amb('a', 'b');
        let y = amb(1, 2);
        { cut; }
        display(x, y);
    "},
    solutions: ["a 1"],
);

test_case!(
    cut_in_function_stays_local,
    input: indoc! {"
        function first(a, b) {
            let v = amb(a, b);
            cut;
            return v;
        }
        first(amb(1, 3), 2);
    "},
    solutions: ["1", "3"],
);

test_case!(
    cut_in_untaken_branch_does_nothing,
    input: indoc! {"
        let x = amb(1, 2, 3);
        if (x > 5) { cut; }
        x;
    "},
    solutions: ["1", "2", "3"],
);

test_case!(
    cut_in_taken_branch,
    input: indoc! {"
        let x = amb(1, 2, 3);
        if (x > 1) { cut; }
        x;
    "},
    solutions: ["1", "2"],
);

test_case!(
    trailing_cut_is_undefined,
    input: "amb(1, 2); cut;",
    solutions: ["undefined"],
);

test_case!(
    cut_as_value_is_an_error,
    input: "let x = 1 + cut;",
    error: "E0107",
);
