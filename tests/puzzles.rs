mod cases;

use cases::with_helpers;
use indoc::indoc;

test_case!(
    pythagorean_triples,
    input: with_helpers(indoc! {"
        let a = range(1, 12);
        let b = range(a, 12);
        let c = range(b, 13);
        require(a * a + b * b === c * c);
        display(a, b, c);
    "}),
    solutions: ["3 4 5", "5 12 13", "6 8 10"],
);

test_case!(
    first_pythagorean_triple_with_cut,
    input: with_helpers(indoc! {"
        let a = range(1, 12);
        let b = range(a, 12);
        let c = range(b, 13);
        require(a * a + b * b === c * c);
        cut;
        display(a, b, c);
    "}),
    solutions: ["3 4 5"],
);

// Baker, Cooper, Fletcher, Miller and Smith live on different floors of a
// five-floor building.
test_case!(
    multiple_dwelling,
    input: with_helpers(indoc! {"
        let baker = range(1, 5);
        require(baker !== 5);
        let cooper = range(1, 5);
        require(cooper !== 1 && cooper !== baker);
        let fletcher = range(1, 5);
        require(fletcher !== 5 && fletcher !== 1);
        require(fletcher !== baker && fletcher !== cooper);
        require(math_abs(fletcher - cooper) !== 1);
        let miller = range(1, 5);
        require(miller > cooper);
        require(miller !== baker && miller !== fletcher);
        let smith = range(1, 5);
        require(smith !== baker && smith !== cooper);
        require(smith !== fletcher && smith !== miller);
        require(math_abs(smith - fletcher) !== 1);
        display(baker, cooper, fletcher, miller, smith);
    "}),
    solutions: ["3 2 4 5 1"],
);

test_case!(
    subset_sum,
    input: with_helpers(indoc! {"
        function pick(total, n) {
            return amb(total, total + n);
        }
        let s = pick(pick(pick(0, 3), 5), 7);
        require(s === 10);
        s;
    "}),
    solutions: ["10"],
);

test_case!(
    map_coloring,
    input: with_helpers(indoc! {"
        function color() { return amb('red', 'green', 'blue'); }
        let a = color();
        let b = color();
        require(a !== b);
        let c = color();
        require(c !== a && c !== b);
        cut;
        display(a, b, c);
    "}),
    solutions: ["red green blue"],
);
