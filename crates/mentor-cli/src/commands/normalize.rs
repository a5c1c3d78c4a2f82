use mentor_core::problem::{ProblemIdentity, is_problem_address};

pub fn run(url: &str) {
    let identity = ProblemIdentity::normalize(url);
    println!("{}", identity);
    if !is_problem_address(url) {
        eprintln!("(not a problem page; only the query string was removed)");
    }
}
