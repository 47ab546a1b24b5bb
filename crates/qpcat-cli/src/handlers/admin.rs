//! Catalog administration: create departments, schemes, semesters and subjects.

use qpcat_core::{Department, NewDepartment, NewScheme, NewSemester, NewSubject, Scheme, Semester, Subject};

use crate::bootstrap::CliContext;
use crate::commands::{DepartmentCommand, SchemeCommand, SemesterCommand, SubjectCommand};
use crate::error::CliError;

pub async fn add_department(
    ctx: &CliContext,
    command: DepartmentCommand,
) -> Result<Department, CliError> {
    let DepartmentCommand::Add {
        name,
        slug,
        description,
    } = command;
    let department = ctx
        .app()
        .catalog()
        .create_department(NewDepartment {
            name,
            slug,
            description,
        })
        .await?;
    Ok(department)
}

pub async fn add_scheme(ctx: &CliContext, command: SchemeCommand) -> Result<Scheme, CliError> {
    let SchemeCommand::Add {
        department,
        year,
        slug,
        description,
    } = command;
    let scheme = ctx
        .app()
        .catalog()
        .create_scheme(NewScheme {
            department_id: department,
            year,
            slug,
            description,
        })
        .await?;
    Ok(scheme)
}

pub async fn add_semester(
    ctx: &CliContext,
    command: SemesterCommand,
) -> Result<Semester, CliError> {
    let SemesterCommand::Add {
        scheme,
        number,
        slug,
    } = command;
    let semester = ctx
        .app()
        .catalog()
        .create_semester(NewSemester {
            scheme_id: scheme,
            number,
            slug,
        })
        .await?;
    Ok(semester)
}

pub async fn add_subject(ctx: &CliContext, command: SubjectCommand) -> Result<Subject, CliError> {
    let SubjectCommand::Add {
        semester,
        name,
        code,
        slug,
        description,
    } = command;
    let subject = ctx
        .app()
        .catalog()
        .create_subject(NewSubject {
            semester_id: semester,
            name,
            subject_code: code,
            slug,
            description,
        })
        .await?;
    Ok(subject)
}

pub async fn execute_department(ctx: &CliContext, command: DepartmentCommand) -> Result<(), CliError> {
    let department = add_department(ctx, command).await?;
    println!(
        "Created department #{} {} ({})",
        department.id, department.name, department.slug
    );
    Ok(())
}

pub async fn execute_scheme(ctx: &CliContext, command: SchemeCommand) -> Result<(), CliError> {
    let scheme = add_scheme(ctx, command).await?;
    println!("Created scheme #{} {} ({})", scheme.id, scheme.label(), scheme.slug);
    Ok(())
}

pub async fn execute_semester(ctx: &CliContext, command: SemesterCommand) -> Result<(), CliError> {
    let semester = add_semester(ctx, command).await?;
    println!(
        "Created semester #{} {} ({})",
        semester.id,
        semester.label(),
        semester.slug
    );
    Ok(())
}

pub async fn execute_subject(ctx: &CliContext, command: SubjectCommand) -> Result<(), CliError> {
    let subject = add_subject(ctx, command).await?;
    println!(
        "Created subject #{} {} ({})",
        subject.id,
        subject.label(),
        subject.slug
    );
    Ok(())
}
