//! Example: Lowering Coverage Strength
//!
//! Generates the same perspective at full combination and at strength 2 to
//! show how pairwise coverage shrinks the suite while still exercising every
//! pair of levels.
//!
//! Run with: `cargo run --example pairwise_strength -p cova-gen`

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::expect_used)]

use cova_gen::{Assignment, Exclusion, FactorDomain, Generator, Perspective};

fn domain() -> FactorDomain {
    FactorDomain::new()
        .group("Given", |g| {
            g.group("User", |u| {
                u.factor("Age", ["0-9", "10-19", "20-"])
                    .factor("Job", ["Student", "Teacher", "Other"])
                    .factor("isRegistered", ["True", "False"])
                    .factor("isEmailVerified", ["True", "False"])
            })
        })
        .factor("When", ["Try to post comments"])
        .factor("Then", ["Success", "Failure", "Any"])
}

fn expect(a: Assignment) -> Assignment {
    let verified = a.get("Given.User.isEmailVerified") == Some("True");
    let can_post = matches!(a.get("Given.User.Job"), Some("Student" | "Teacher"));
    a.with("Then", if verified && can_post { "Success" } else { "Failure" })
}

fn main() {
    let exclusions = vec![
        Exclusion::new()
            .exact("Given.User.isRegistered", "False")
            .exact("Given.User.isEmailVerified", "True"),
        Exclusion::new()
            .exact("Given.User.Age", "0-9")
            .exact("Given.User.Job", "Teacher"),
    ];
    let variables = [
        "Given.User.Age",
        "Given.User.Job",
        "Given.User.isRegistered",
        "Given.User.isEmailVerified",
    ];

    for strength in [4, 3, 2] {
        let perspective = Perspective::new(format!("Posting at strength {strength}"), expect)
            .with_variables(variables)
            .with_strength(strength);
        let suite = Generator::new(domain())
            .with_exclusions(exclusions.clone())
            .with_perspective(perspective)
            .generate()
            .expect("generate");
        let summary = &suite.summaries()[0];
        println!(
            "strength {strength}: {} requirements -> {} test cases",
            summary.requirements,
            suite.len()
        );
    }
}
