mod capture_flow_tests;
