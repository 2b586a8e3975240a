mod dashboard_test;
mod helpers;
mod pages_test;
