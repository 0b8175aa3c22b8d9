mod category_tests;
mod runner_tests;
