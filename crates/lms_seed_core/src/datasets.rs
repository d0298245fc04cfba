//! crates/lms_seed_core/src/datasets.rs
//!
//! Built-in demo content: course templates, placeholder videos and the quiz
//! question banks. Text is in the locale the target platform serves.

use crate::domain::{AccountSpec, Answer, Category, CourseTemplate, Question, QuestionKind};

/// Workshop courses created by the full seed.
pub const WORKSHOP_COURSES: [CourseTemplate; 7] = [
    CourseTemplate {
        title: "Taller de Robótica con Arduino",
        description: "Aprende electrónica básica y construye tu primer robot.",
        category: Category::Secundaria,
    },
    CourseTemplate {
        title: "Fotografía Digital y Edición",
        description: "Dominio de la cámara, iluminación y retoque básico.",
        category: Category::Secundaria,
    },
    CourseTemplate {
        title: "Finanzas Personales para Jóvenes",
        description: "Cómo ahorrar, invertir y manejar tu primer presupuesto.",
        category: Category::Preparatoria,
    },
    CourseTemplate {
        title: "Desarrollo de Videojuegos 2D",
        description: "Programación lógica y diseño de niveles en Unity.",
        category: Category::Preparatoria,
    },
    CourseTemplate {
        title: "Oratoria y Debate Público",
        description: "Técnicas para hablar frente a audiencias sin miedo.",
        category: Category::Preparatoria,
    },
    CourseTemplate {
        title: "Huerto Urbano y Sustentabilidad",
        description: "Cultivo de alimentos orgánicos en espacios pequeños.",
        category: Category::Secundaria,
    },
    CourseTemplate {
        title: "Producción Musical Digital",
        description: "Creación de beats, mezcla y uso de software de audio.",
        category: Category::Preparatoria,
    },
];

/// School subjects created by the content-only seed.
pub const SCHOOL_SUBJECTS: [CourseTemplate; 7] = [
    CourseTemplate {
        title: "Matemáticas I: Álgebra Básica",
        description: "Introducción a variables y ecuaciones lineales.",
        category: Category::Secundaria,
    },
    CourseTemplate {
        title: "Historia de México",
        description: "Desde la época prehispánica hasta la independencia.",
        category: Category::Secundaria,
    },
    CourseTemplate {
        title: "Biología General",
        description: "La célula, genética y biodiversidad.",
        category: Category::Preparatoria,
    },
    CourseTemplate {
        title: "Física II: Mecánica",
        description: "Leyes de Newton y movimiento rectilíneo.",
        category: Category::Preparatoria,
    },
    CourseTemplate {
        title: "Literatura Universal",
        description: "Análisis de obras clásicas y modernas.",
        category: Category::Preparatoria,
    },
    CourseTemplate {
        title: "Geografía Mundial",
        description: "Recursos naturales y geopolítica.",
        category: Category::Secundaria,
    },
    CourseTemplate {
        title: "Química Orgánica",
        description: "Estructura del carbono y grupos funcionales.",
        category: Category::Preparatoria,
    },
];

pub const VIDEO_LINKS: [&str; 4] = [
    "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    "https://www.youtube.com/watch?v=jNQXAC9IVRw",
    "https://www.youtube.com/watch?v=9bZkp7q19f0",
    "https://www.youtube.com/watch?v=3tmd-ClpJxA",
];

pub const LESSON_DESCRIPTION: &str = "Visualizar el video completo para asistencia.";
pub const QUIZ_DESCRIPTION: &str = "Demuestra lo aprendido en esta lección.";
pub const BULK_QUIZ_DESCRIPTION: &str = "Just a test quiz.";

pub fn lesson_title(n: usize) -> String {
    format!("Lección {n}: Conceptos Fundamentales")
}

pub fn lesson_video_title(n: usize) -> String {
    format!("Video del Tema {n}")
}

pub fn quiz_title(n: usize) -> String {
    format!("Quiz {n}: Evaluación Práctica")
}

pub fn bulk_quiz_title(n: usize) -> String {
    format!("Test quiz {n}")
}

pub fn student_email(n: usize) -> String {
    format!("test_{n}@test.com")
}

/// Account specs for the numbered test students, starting at 1.
pub fn student_accounts(count: usize, password: &str) -> Vec<AccountSpec> {
    (1..=count)
        .map(|n| AccountSpec::new(format!("Test Student {n}"), student_email(n), password))
        .collect()
}

/// Email list for test students that are assumed to exist already.
pub fn student_emails(count: usize) -> Vec<String> {
    (1..=count).map(student_email).collect()
}

fn question(
    title: &str,
    kind: QuestionKind,
    options: Option<&[&str]>,
    correct_answer: Answer,
    value: u32,
) -> Question {
    Question {
        title: title.to_string(),
        kind,
        options: options.map(|opts| opts.iter().map(|o| o.to_string()).collect()),
        code: None,
        lang: None,
        correct_answer,
        value,
    }
}

fn complete_the_code(value: u32) -> Question {
    Question {
        code: Some("int age = 20;\n[blank]\n{\n\tstd::cout << \"Access granted\";\n}".to_string()),
        lang: Some("cpp".to_string()),
        ..question(
            "Fill in the missing code to correctly output \"Access granted\" only if the integer variable 'age' is greater than or equal to 18:",
            QuestionKind::CompleteTheCode,
            Some(&["if (age >= 18)", "if (age == 18)", "while (age > 17)"]),
            Answer::text("if (age >= 18)"),
            value,
        )
    }
}

/// The five C++ fundamentals questions used by the full seed.
pub fn seed_question_bank() -> Vec<Question> {
    vec![
        question(
            "Which C++ fundamental data type is typically used to store single-precision floating-point numbers?",
            QuestionKind::MultipleChoice,
            Some(&["int", "double", "float", "bool"]),
            Answer::text("float"),
            1,
        ),
        question(
            "A ______ loop in C++ is an exit-controlled loop, meaning its condition is checked after its body executes at least once.",
            QuestionKind::FillInTheBlank,
            None,
            Answer::text("do-while"),
            1,
        ),
        question(
            "Select all of the following C++ operators that are used for logical operations:",
            QuestionKind::MultipleAnswer,
            Some(&["+", "&&", ">", "||", "!", "*"]),
            Answer::choices(["&&", "||", "!"]),
            2,
        ),
        complete_the_code(2),
        question(
            "In C++, the expression 5 / 2 results in 2.5.",
            QuestionKind::TrueFalse,
            None,
            Answer::text("False"),
            2,
        ),
    ]
}

/// The larger bank used by the bulk quiz flow.
pub fn bulk_question_bank() -> Vec<Question> {
    let mut bank = seed_question_bank();
    bank.push(question("NOT NOT", QuestionKind::TrueFalse, None, Answer::text("True"), 2));
    bank.push(question("NOT TRUE", QuestionKind::TrueFalse, None, Answer::text("False"), 2));
    bank.push(question(
        "What is the correct syntax for a 'for' loop that iterates 5 times, from $i=0$ up to $i=4$?",
        QuestionKind::MultipleChoice,
        Some(&[
            "for (int i; i < 5; i++)",
            "for (int i = 0; i <= 5; i++)",
            "for (int i = 0; i < 5; i++)",
            "for (i = 0; i < 5; i++)",
        ]),
        Answer::text("for (int i = 0; i < 5; i++)"),
        1,
    ));
    bank
}
