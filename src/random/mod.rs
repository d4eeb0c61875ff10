pub(crate) mod seeded;
