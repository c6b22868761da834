// ABOUTME: Scenario tests for the application controller
// ABOUTME: Drive the App through recording collaborators and a scripted backend

mod support;

mod session_tests;
