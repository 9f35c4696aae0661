mod auth_endpoint_tests;
