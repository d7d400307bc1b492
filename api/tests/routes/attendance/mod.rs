mod check_in_test;
mod reports_test;
