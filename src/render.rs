use crate::{DayIndex, People, Schedule, WeeklyAggregation};

/// Boxed text table with one column per header; cells may not contain newlines.
pub fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate().take(widths.len()) {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, headers.iter().copied(), &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    let mut cells = cells;
    for w in widths {
        let cell = cells.next().unwrap_or("");
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(w.saturating_sub(cell.chars().count())));
        out.push_str(" |");
    }
    out.push('\n');
}

/// Compact single-line form used in table cells: `09:00-12:00, 14:00-15:00`.
fn compact(schedule: &Schedule) -> String {
    schedule
        .ranges()
        .iter()
        .map(|r| format!("{}-{}", r.from(), r.to()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_people(people: &People) -> String {
    let day_names: Vec<&str> = DayIndex::all().map(|d| &d.name()[..3]).collect();
    let mut headers = vec!["name"];
    headers.extend(day_names);

    let rows: Vec<Vec<String>> = people
        .iter()
        .map(|person| {
            let mut row = vec![person.name.clone()];
            row.extend(
                DayIndex::all().map(|day| person.day(day).map(compact).unwrap_or_default()),
            );
            row
        })
        .collect();

    render_text_table(&headers, &rows)
}

pub fn render_week(week: &WeeklyAggregation) -> String {
    let mut out = String::new();
    for aggregation in &week.days {
        out.push_str(aggregation.day.name());
        out.push_str(":\n");
        if aggregation.schedule.is_empty() {
            out.push_str("  free\n");
            continue;
        }
        for line in aggregation.schedule.format().lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Person;

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let table = render_text_table(&["a", "bb"], &[vec!["long".into(), "x".into()]]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "+------+----+");
        assert_eq!(lines[1], "| a    | bb |");
        assert_eq!(lines[3], "| long | x  |");
    }

    #[test]
    fn people_table_lists_ranges_per_day() {
        let people = People::from(vec![Person::new("Alice").with_day(
            DayIndex::new(1).unwrap(),
            Schedule::from_pairs(&[("09:00", "10:00"), ("11:00", "12:00")]).unwrap(),
        )]);
        let table = render_people(&people);
        assert!(table.contains("| Tue "));
        assert!(table.contains("09:00-10:00, 11:00-12:00"));
    }
}
