use cardapio_shared::{
    DateRange, iso_date,
    mealplan::{MealPlanEntry, MealType},
};
use serde::Serialize;
use time::{Date, Month};

use crate::{WeekStart, month_range, week_range};

/// Meals planned for one day, bucketed by slot.
///
/// Breakfast, lunch and dinner hold the first matching entry in source order.
/// Further entries for an already filled slot land in `overflow`: they are
/// kept for display but not counted.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayMeals {
    pub breakfast: Option<MealPlanEntry>,
    pub lunch: Option<MealPlanEntry>,
    pub dinner: Option<MealPlanEntry>,
    pub snacks: Vec<MealPlanEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overflow: Vec<MealPlanEntry>,
}

impl DayMeals {
    /// Snacks are all kept, the other slots hold one entry each.
    fn push(&mut self, entry: &MealPlanEntry) {
        let slot = match entry.meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
            MealType::Snack => {
                self.snacks.push(entry.clone());
                return;
            }
        };

        match slot {
            Some(_) => self.overflow.push(entry.clone()),
            None => *slot = Some(entry.clone()),
        }
    }

    /// Counted entries: the three single slots then every snack.
    pub fn entries(&self) -> impl Iterator<Item = &MealPlanEntry> {
        self.breakfast
            .iter()
            .chain(self.lunch.iter())
            .chain(self.dinner.iter())
            .chain(self.snacks.iter())
    }

    pub fn total(&self) -> u32 {
        self.entries().count() as u32
    }

    pub fn completed(&self) -> u32 {
        self.entries().filter(|entry| entry.completed).count() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0 && self.overflow.is_empty()
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub is_today: bool,
    pub is_current_month: bool,
    pub is_past: bool,
    pub meals: DayMeals,
    pub total_meals: u32,
}

/// Builds one [`CalendarDay`] per date of `range`, both ends included.
///
/// Entries are matched on their exact date. `reference_month` is any day of
/// the month used for the `is_current_month` flag.
pub fn generate_days(
    range: DateRange,
    entries: &[MealPlanEntry],
    today: Date,
    reference_month: Date,
) -> Vec<CalendarDay> {
    let mut days = Vec::with_capacity(range.len_days());
    let mut cursor = range.start;

    while cursor <= range.end {
        let mut meals = DayMeals::default();
        for entry in entries.iter().filter(|entry| entry.is_on(cursor)) {
            meals.push(entry);
        }

        days.push(CalendarDay {
            date: cursor,
            is_today: cursor == today,
            is_current_month: same_month(cursor, reference_month),
            is_past: cursor < today,
            total_meals: meals.total(),
            meals,
        });

        let Some(next) = cursor.next_day() else {
            break;
        };
        cursor = next;
    }

    days
}

fn same_month(a: Date, b: Date) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn totals<'a>(days: impl Iterator<Item = &'a CalendarDay>) -> (u32, u32) {
    days.fold((0, 0), |(total, completed), day| {
        (total + day.total_meals, completed + day.meals.completed())
    })
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub range: DateRange,
    pub days: Vec<CalendarDay>,
    pub total_recipes: u32,
    pub completed_meals: u32,
}

impl WeekView {
    pub fn new(range: DateRange, entries: &[MealPlanEntry], today: Date) -> Self {
        let days = generate_days(range, entries, today, today);
        let (total_recipes, completed_meals) = totals(days.iter());

        Self {
            range,
            days,
            total_recipes,
            completed_meals,
        }
    }

    /// Week containing `date`.
    pub fn around(
        date: Date,
        week_start: WeekStart,
        entries: &[MealPlanEntry],
        today: Date,
    ) -> Self {
        Self::new(week_range(date, week_start), entries, today)
    }

    pub fn today(&self) -> Option<&CalendarDay> {
        self.days.iter().find(|day| day.is_today)
    }
}

/// A month laid out on whole weeks.
///
/// Leading and trailing days borrowed from the adjacent months are flagged
/// `is_current_month = false` and left out of the totals.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: Month,
    pub range: DateRange,
    pub days: Vec<CalendarDay>,
    pub total_recipes: u32,
    pub completed_meals: u32,
}

impl MonthView {
    pub fn new(
        reference: Date,
        week_start: WeekStart,
        entries: &[MealPlanEntry],
        today: Date,
    ) -> Self {
        let range = Self::padded_range(reference, week_start);
        let days = generate_days(range, entries, today, reference);
        let (total_recipes, completed_meals) =
            totals(days.iter().filter(|day| day.is_current_month));

        Self {
            year: reference.year(),
            month: reference.month(),
            range,
            days,
            total_recipes,
            completed_meals,
        }
    }

    /// Month of `reference` extended to the first and last day of its weeks.
    pub fn padded_range(reference: Date, week_start: WeekStart) -> DateRange {
        let month = month_range(reference);

        DateRange::new(
            week_range(month.start, week_start).start,
            week_range(month.end, week_start).end,
        )
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }
}
